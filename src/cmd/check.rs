use crate::reports;
use bvopt::problem::Problem;
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Problem file (JSON).
    pub problem: String,
}

/// Evaluates the problem on its initial model, or all-zero when none is given.
pub fn run(_args: CheckArgs, problem: &Problem) {
    let model = problem
        .initial
        .clone()
        .unwrap_or_else(|| problem.signature.zero_model());

    println!("\n🔎 === PROBLEM CHECK === 🔎");
    reports::print_model(&problem.signature, &model);

    let verdicts: Vec<bool> = problem.assertions.iter().map(|a| a.holds(&model)).collect();
    reports::print_assertion_report(&verdicts);

    let value = problem.objective.eval(&model);
    println!(
        "Objective ({} bits, {}): {}",
        problem.objective.width(),
        problem.direction,
        value
    );
}
