//! Basic example of using the KenKen engine

use kenken_core::{generate, solve, validate_board};

fn main() {
    // Generate a puzzle; the seed makes it reproducible
    println!("Generating a 4x4 puzzle from seed \"demo\"...\n");
    let puzzle = generate(4, Some("demo"));

    println!("Cages:");
    for cage in &puzzle.cages {
        let cells: Vec<String> = cage
            .members
            .iter()
            .map(|c| format!("({},{})", c.row, c.col))
            .collect();
        println!("  {} {} {}", cells.join(" "), cage.operator, cage.target);
    }

    // Solve it
    println!("\nSolving...\n");
    match solve(puzzle.size, &puzzle.cages) {
        Some(result) => {
            println!("Solution:");
            println!("{}", result.solution);
            println!(
                "checks: {}, assignments: {}, {:.4}s",
                result.checks, result.assigns, result.elapsed_seconds
            );

            // Re-check the solved board against the rules
            let report = validate_board(&puzzle, &result.solution);
            println!("valid: {}", report.valid);
        }
        None => println!("No solution found (this shouldn't happen for a generated puzzle!)"),
    }

    // The external cage format used by frontends (0-indexed cells)
    println!("\nExternal cages as JSON:");
    for cage in puzzle.to_external() {
        println!(
            "  {}",
            serde_json::to_string(&cage).expect("cage serializes")
        );
    }
}
