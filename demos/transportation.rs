use transport::{Diagnostics, Method, Objective, TransportationProblem};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    for objective in [Objective::Minimize, Objective::Maximize] {
        #[rustfmt::skip]
        let problem = TransportationProblem::from_row_slice(
            vec![20, 30, 25],
            vec![15, 25, 35],
            &[
                 8,  6, 10,
                 9, 12, 13,
                14,  9, 16,
            ],
            objective,
        )?;

        for method in Method::ALL {
            let solution = method.solve(&problem)?;
            println!("{method} ({objective}): {solution}");
            for step in &solution.trace {
                let (row, col) = step.cell;
                print!(
                    "  {}: {} units S{} -> D{}, running {}",
                    step.index + 1,
                    step.amount,
                    row + 1,
                    col + 1,
                    step.total
                );
                if let Diagnostics::Vogel(p) = &step.diagnostics {
                    print!(", penalties rows {:?} cols {:?}", p.rows, p.cols);
                }
                println!();
            }
            println!("{}", solution.plan.matrix());
        }
    }

    Ok(())
}
