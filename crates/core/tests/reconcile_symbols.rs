use std::collections::BTreeSet;

use boundary_core::config::ModuleFiles;
use boundary_core::model::Symbol;
use boundary_core::symtab::{
    resolve_declaring_file, strip_clone_suffix, LocalCounter, Reconciler, SymbolEntry,
};

const CORE: &str = "kernel/sched/core.c";
const FAIR: &str = "kernel/sched/fair.c";
const SCHED_H: &str = "kernel/sched/sched.h";
const STATS_H: &str = "kernel/sched/stats.h";

fn modules() -> ModuleFiles {
    ModuleFiles::new([CORE, SCHED_H, FAIR, STATS_H])
}

fn known(symbols: &[(&str, &str)]) -> BTreeSet<Symbol> {
    symbols.iter().map(|(n, f)| Symbol::new(*n, *f)).collect()
}

#[test]
fn clone_suffixes_are_stripped() {
    assert_eq!(strip_clone_suffix("handle.isra.3"), "handle");
    assert_eq!(strip_clone_suffix("update_curr.part.0"), "update_curr");
    assert_eq!(strip_clone_suffix("set_load_weight.constprop.12"), "set_load_weight");
    assert_eq!(strip_clone_suffix("schedule"), "schedule");
    assert_eq!(strip_clone_suffix(".LC0"), ".LC0");
}

#[test]
fn local_counter_numbers_occurrences_in_scan_order() {
    let mut counter = LocalCounter::new();
    assert_eq!(counter.next("foo"), 1);
    assert_eq!(counter.next("bar"), 1);
    assert_eq!(counter.next("foo"), 2);
}

#[test]
fn suffixed_binary_symbol_matches_metadata_symbol() {
    let modules = modules();
    let known = known(&[("handle", CORE)]);
    let entries = vec![SymbolEntry::file("core.c"), SymbolEntry::local_func("handle.isra.3")];

    let linked = Reconciler::new(&modules, &known).reconcile(&entries);

    assert!(linked.contains(&Symbol::new("handle", CORE)));
    assert_eq!(linked.local_position(&Symbol::new("handle", CORE)), 1);
    assert!(linked.unattributed.is_empty());
}

#[test]
fn local_positions_count_every_local_regardless_of_module() {
    let modules = modules();
    let known = known(&[("foo", CORE)]);
    let entries = vec![
        SymbolEntry::file("a.c"),
        SymbolEntry::local_func("foo"),
        SymbolEntry::file("core.c"),
        SymbolEntry::local_func("foo"),
        SymbolEntry::global_func("foo_global"),
    ];

    let linked = Reconciler::new(&modules, &known).reconcile(&entries);

    assert_eq!(linked.local_position(&Symbol::new("foo", CORE)), 2);
    let outside = Symbol::new("foo", "a.c");
    assert_eq!(linked.local_position(&outside), 0, "outside files are not recorded");
    assert!(!linked.contains(&Symbol::new("foo", "a.c")));
}

#[test]
fn header_functions_are_attributed_to_first_declaring_header() {
    let modules = modules();
    // `update_load` is a static inline from sched.h emitted into two objects.
    let known = known(&[("update_load", SCHED_H), ("update_load", STATS_H)]);
    let entries = vec![
        SymbolEntry::file("core.c"),
        SymbolEntry::local_func("update_load"),
        SymbolEntry::file("fair.c"),
        SymbolEntry::local_func("update_load.part.1"),
    ];

    let linked = Reconciler::new(&modules, &known).reconcile(&entries);

    let sym = Symbol::new("update_load", SCHED_H);
    assert!(linked.contains(&sym));
    assert!(!linked.contains(&Symbol::new("update_load", STATS_H)));
    assert_eq!(linked.local_position(&sym), 2, "last occurrence wins under the same key");
    assert_eq!(linked.linked.len(), 1);
}

#[test]
fn globals_attributed_elsewhere_are_searched_across_module_files() {
    let modules = modules();
    let known = known(&[("schedule", CORE), ("printk", "kernel/printk/printk.c")]);
    let entries = vec![
        SymbolEntry::file("usercopy_64.c"),
        SymbolEntry::global_func("schedule"),
        SymbolEntry::global_func("printk"),
    ];

    let linked = Reconciler::new(&modules, &known).reconcile(&entries);

    assert!(linked.contains(&Symbol::new("schedule", CORE)));
    assert_eq!(linked.local_position(&Symbol::new("schedule", CORE)), 0);
    assert_eq!(linked.linked.len(), 1, "library code is not a subsystem symbol");
    assert!(linked.unattributed.is_empty(), "unrelated globals are not flagged");
}

#[test]
fn global_already_known_in_reported_file_is_kept() {
    let modules = modules();
    let known = known(&[("pick_next_task_fair", FAIR), ("pick_next_task_fair", CORE)]);
    let entries =
        vec![SymbolEntry::file("fair.c"), SymbolEntry::global_func("pick_next_task_fair")];
    let linked = Reconciler::new(&modules, &known).reconcile(&entries);
    assert!(linked.contains(&Symbol::new("pick_next_task_fair", FAIR)));
    assert!(!linked.contains(&Symbol::new("pick_next_task_fair", CORE)));
}

#[test]
fn unresolvable_attribution_falls_back_to_reported_file() {
    let modules = modules();
    let known = BTreeSet::new();
    let entries = vec![SymbolEntry::file("core.c"), SymbolEntry::local_func("mystery")];

    let linked = Reconciler::new(&modules, &known).reconcile(&entries);

    let sym = Symbol::new("mystery", CORE);
    assert!(linked.contains(&sym));
    assert_eq!(linked.unattributed, vec![sym.clone()]);
    assert_eq!(linked.local_position(&sym), 1);
}

#[test]
fn functions_before_any_file_marker_are_ignored() {
    let modules = modules();
    let known = known(&[("early", CORE)]);
    let entries = vec![SymbolEntry::local_func("early"), SymbolEntry::file("core.c")];
    let linked = Reconciler::new(&modules, &known).reconcile(&entries);
    assert!(linked.linked.is_empty());
}

#[test]
fn candidate_search_respects_order() {
    let candidates = vec![SCHED_H.to_string(), STATS_H.to_string()];
    let known = known(&[("f", STATS_H), ("f", SCHED_H), ("g", STATS_H)]);
    assert_eq!(resolve_declaring_file("f", &candidates, &known), Some(SCHED_H));
    assert_eq!(resolve_declaring_file("g", &candidates, &known), Some(STATS_H));
    assert_eq!(resolve_declaring_file("h", &candidates, &known), None);
}
