//! Shared on-disk fixture: a tiny scheduler tree with metadata records, a
//! boundary config, a stand-in `vmlinux` and a captured `readelf` listing.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const CORE: &str = "kernel/sched/core.c";

const CONFIG: &str = "mod_files:
  - kernel/sched/core.c
  - kernel/sched/sched.h
function:
livepatch:
  name: sched_boundary
";

const CORE_RECORD: &str = r#"{
  "fn": [
    {"name": "schedule", "file": "kernel/sched/core.c", "public": true},
    {"name": "__schedule", "file": "kernel/sched/core.c"},
    {"name": "wake_up_new_task", "file": "kernel/sched/core.c", "public": true},
    {"name": "activate", "file": "kernel/sched/core.c"},
    {"name": "task_tick", "file": "kernel/sched/core.c", "public": true}
  ],
  "interface": [["schedule", "kernel/sched/core.c"]],
  "fn_ptr": [["task_tick", "?"]],
  "edge": [
    {"from": ["schedule", "kernel/sched/core.c"], "to": ["__schedule", "kernel/sched/core.c"]},
    {"from": ["wake_up_new_task", "kernel/sched/core.c"], "to": ["activate", "kernel/sched/core.c"]}
  ]
}"#;

const FORK_RECORD: &str = r#"{
  "fn": [{"name": "copy_process", "file": "kernel/fork.c", "public": true}],
  "edge": [{"from": ["copy_process", "kernel/fork.c"], "to": ["wake_up_new_task", "?"]}]
}"#;

pub const LISTING: &str = "
Symbol table '.symtab' contains 8 entries:
   Num:    Value          Size Type    Bind   Vis      Ndx Name
     1: 0000000000000000     0 FILE    LOCAL  DEFAULT  ABS fork.c
     2: ffffffff81000000    64 FUNC    GLOBAL DEFAULT    1 copy_process
     3: 0000000000000000     0 FILE    LOCAL  DEFAULT  ABS core.c
     4: ffffffff81000100   128 FUNC    GLOBAL DEFAULT    1 schedule
     5: ffffffff81000180    64 FUNC    LOCAL  DEFAULT    1 __schedule.isra.0
     6: ffffffff810001c0    64 FUNC    GLOBAL DEFAULT    1 wake_up_new_task
     7: ffffffff81000200    64 FUNC    GLOBAL DEFAULT    1 task_tick
";

/// Populate `root` with config, metadata and `vmlinux`; returns the listing path.
pub fn write_tree(root: &Path) -> PathBuf {
    fs::write(root.join("sched_boundary.yaml"), CONFIG).unwrap();
    fs::create_dir_all(root.join("kernel/sched")).unwrap();
    fs::write(root.join("kernel/sched/core.o.sched_boundary"), CORE_RECORD).unwrap();
    fs::write(root.join("kernel/fork.o.sched_boundary"), FORK_RECORD).unwrap();
    fs::write(root.join("vmlinux"), b"\x7fELF").unwrap();
    let listing = root.join("vmlinux.syms");
    fs::write(&listing, LISTING).unwrap();
    listing
}

/// Point the readelf backend at a captured listing for in-process command calls.
///
/// Every caller shares the same listing, so the variable is set once.
pub fn use_fake_readelf() {
    static LISTING_PATH: OnceLock<PathBuf> = OnceLock::new();
    LISTING_PATH.get_or_init(|| {
        let path = Path::new(env!("CARGO_TARGET_TMPDIR")).join("sched_boundary_fixture.syms");
        fs::write(&path, LISTING).unwrap();
        std::env::set_var("SB_READELF_FAKE_OUTPUT", &path);
        path
    });
}
