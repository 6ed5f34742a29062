//! Test support: a stub GMT installation whose plotting programs echo
//! their command line, so the PostScript file records every call.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

const LISTING: &str = "\
PAPER_MEDIA = a4
PAGE_ORIENTATION = portrait
LABEL_FONT_SIZE = 24p
LABEL_FONT = 0
BASEMAP_AXES = WESN
";

pub(crate) fn plot_toolkit() -> TempDir {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    write_stub(
        dir.path(),
        "gmtdefaults",
        &format!("cat <<'EOF'\n{LISTING}EOF"),
    );
    write_stub(
        dir.path(),
        "gmtset",
        "echo $@ >> \"$(dirname \"$0\")/gmtset.log\"",
    );
    for tool in [
        "pstext",
        "psbasemap",
        "psxy",
        "pscoast",
        "psclip",
        "psscale",
        "grdimage",
        "grdcontour",
    ] {
        write_stub(
            dir.path(),
            tool,
            &format!("cat > /dev/null\necho {tool} $@"),
        );
    }
    // Deterministic fake projection: shift x by 1 and y by 2.
    write_stub(dir.path(), "mapproject", "awk '{ print $1 + 1, $2 + 2 }'");
    dir
}

pub(crate) fn write_stub(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
}
