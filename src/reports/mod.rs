use bvopt::model::{Model, Signature};
use bvopt::optimizer::moves::MoveKind;
use bvopt::optimizer::SearchStats;
use bvopt::{Direction, OptimizationResult};
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use strum::IntoEnumIterator;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn print_result(result: &OptimizationResult, direction: Direction) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Result").add_attribute(Attribute::Bold),
        Cell::new("Value").fg(Color::Cyan),
    ]);

    let dash = || "-".to_string();
    table.add_row(vec![Cell::new("Status"), Cell::new(result.is_sat.to_string())]);
    table.add_row(vec![Cell::new("Direction"), Cell::new(direction.to_string())]);
    table.add_row(vec![
        Cell::new("Optimum"),
        Cell::new(result.optimum.as_ref().map_or_else(dash, |v| v.to_string())),
    ]);
    table.add_row(vec![
        Cell::new("Objective"),
        Cell::new(
            result
                .objective_value
                .as_ref()
                .map_or_else(dash, |v| v.to_string()),
        ),
    ]);

    println!("\n{}", table);
}

pub fn print_model(signature: &Signature, model: &Model) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Variable").add_attribute(Attribute::Bold),
        Cell::new("Sort"),
        Cell::new("Value").fg(Color::Green),
        Cell::new("Hex"),
    ]);

    for var in signature.vars() {
        let value = model
            .get(var.id)
            .map_or_else(|| "?".to_string(), |v| v.to_string());
        let hex = model
            .get(var.id)
            .map_or_else(|| "?".to_string(), |v| format!("{:#x}", v));
        table.add_row(vec![
            Cell::new(signature.name(var.id)),
            Cell::new(format!("{:?}", var.sort)),
            Cell::new(value).set_alignment(CellAlignment::Right),
            Cell::new(hex).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("\n{}", table);
}

pub fn print_stats(stats: &SearchStats) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Iter").add_attribute(Attribute::Bold),
        Cell::new("Moves"),
        Cell::new("Divers"),
        Cell::new("Restarts"),
        Cell::new("Evals"),
        Cell::new("Time"),
    ]);
    table.add_row(vec![
        Cell::new(stats.iterations),
        Cell::new(stats.moves),
        Cell::new(stats.diversifications),
        Cell::new(stats.restarts),
        Cell::new(stats.what_if_evals),
        Cell::new(format!("{:.2?}", stats.elapsed)),
    ]);

    println!("\n{}", table);
}

/// Committed moves per kind, in catalog order. Kinds never taken are skipped.
pub fn print_move_kinds(stats: &SearchStats) {
    let counts: Vec<(MoveKind, usize)> = MoveKind::iter()
        .filter_map(|kind| stats.move_kinds.get(&kind).map(|&n| (kind, n)))
        .collect();
    if counts.is_empty() {
        return;
    }

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Move").add_attribute(Attribute::Bold),
        Cell::new("Taken"),
    ]);
    for (kind, n) in counts {
        table.add_row(vec![
            Cell::new(kind.to_string()),
            Cell::new(n).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("\n{}", table);
}

pub fn print_assertion_report(verdicts: &[bool]) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Assertion").add_attribute(Attribute::Bold),
        Cell::new("Holds"),
    ]);
    for (i, &holds) in verdicts.iter().enumerate() {
        let cell = if holds {
            Cell::new("yes")
        } else {
            Cell::new("NO").add_attribute(Attribute::Bold)
        };
        table.add_row(vec![Cell::new(format!("#{}", i)), cell]);
    }

    let failed = verdicts.iter().filter(|h| !**h).count();
    println!("\n{}", table);
    println!("Violated: {} of {}", failed, verdicts.len());
}
