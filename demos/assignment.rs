use transport::{AssignmentProblem, AssignmentStep, CoverRule, HungarianConfig, HungarianSolver, Objective};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    #[rustfmt::skip]
    let cases = [
        (Objective::Minimize, [
            15, 19, 21, 18,
            17, 18, 20, 17,
            14, 17, 17, 16,
            19, 21, 23, 21,
        ]),
        (Objective::Maximize, [
            185, 215, 210, 220,
            200, 220, 240, 225,
            210, 225, 215, 230,
            190, 230, 235, 240,
        ]),
    ];

    for (objective, entries) in cases {
        let problem = AssignmentProblem::from_row_slice(4, &entries, objective)?;
        for rule in [CoverRule::Exact, CoverRule::Greedy] {
            let solver = HungarianSolver::new(HungarianConfig::default().with_rule(rule));
            match solver.solve(&problem) {
                Ok(solution) => {
                    println!("{objective} / {rule:?}: {solution}");
                    for step in &solution.trace {
                        match step {
                            AssignmentStep::LineCover { iteration, lines, .. } => {
                                println!("  [{}] pass {iteration}: lines {lines:?}", step.name())
                            }
                            AssignmentStep::Adjustment { min_uncovered, .. } => {
                                println!("  [{}] by {min_uncovered}", step.name())
                            }
                            _ => println!("  [{}]", step.name()),
                        }
                        println!("{}", step.matrix());
                    }
                }
                Err(err) => println!("{objective} / {rule:?}: {err}"),
            }
        }
    }

    Ok(())
}
