use nalgebra::DMatrix;
use transport::{
    hungarian, AssignmentProblem, CoverRule, Diagnostics, HungarianConfig, HungarianSolver, Method, Objective,
    TransportationProblem,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn instances() -> Vec<TransportationProblem<i64>> {
    #[rustfmt::skip]
    let raw: Vec<(Vec<u64>, Vec<u64>, Vec<i64>)> = vec![
        (vec![20, 30, 25], vec![15, 25, 35], vec![
             8,  6, 10,
             9, 12, 13,
            14,  9, 16,
        ]),
        (vec![100, 150, 200], vec![120, 180, 150], vec![
            2, 3, 1,
            5, 4, 8,
            5, 6, 7,
        ]),
        (vec![7, 9, 18], vec![5, 8, 7, 14], vec![
            19, 30, 50, 10,
            70, 30, 40, 60,
            40,  8, 70, 20,
        ]),
        (vec![10, 0, 10], vec![5, 5, 10], vec![
            4, 4, 4,
            1, 1, 1,
            4, 4, 4,
        ]),
        (vec![50], vec![10, 15, 25], vec![3, 1, 2]),
    ];
    raw.into_iter()
        .flat_map(|(supply, demand, cost)| {
            [Objective::Minimize, Objective::Maximize].map(|objective| {
                TransportationProblem::from_row_slice(supply.clone(), demand.clone(), &cost, objective)
                    .expect("consistent shape")
            })
        })
        .collect()
}

#[test]
fn conservation() {
    init();
    for problem in instances() {
        for method in Method::ALL {
            let solution = method.solve(&problem).expect("balanced");
            assert!(solution.plan.is_feasible_for(&problem), "{method} violates row/column totals");
            assert_eq!(solution.plan.total(), problem.total_supply());
            assert_eq!(solution.plan.total(), problem.total_demand());
            assert_eq!(solution.total, solution.plan.cost_under(problem.cost()).expect("fits"));
        }
    }
}

#[test]
fn deactivated_lines_are_never_revisited() {
    for problem in instances() {
        let (rows, cols) = problem.cost().shape();
        for method in Method::ALL {
            let solution = method.solve(&problem).expect("balanced");
            assert!(solution.trace.len() < rows + cols);

            let mut closed_rows = vec![false; rows];
            let mut closed_cols = vec![false; cols];
            for step in &solution.trace {
                let (i, j) = step.cell;
                assert!(!closed_rows[i] && !closed_cols[j], "{method} revisited {:?}", step.cell);
                assert!(step.amount > 0);
                for (r, active) in step.active.rows().iter().enumerate() {
                    assert!(!(closed_rows[r] && *active), "row {r} reactivated");
                    closed_rows[r] |= !active;
                }
                for (c, active) in step.active.cols().iter().enumerate() {
                    assert!(!(closed_cols[c] && *active), "column {c} reactivated");
                    closed_cols[c] |= !active;
                }
            }
            assert!(closed_rows.iter().all(|&c| c) && closed_cols.iter().all(|&c| c));
        }
    }
}

#[test]
fn northwest_corner_walks_lexicographically() {
    for problem in instances() {
        let solution = Method::NorthwestCorner.solve(&problem).expect("balanced");
        let cells: Vec<_> = solution.trace.iter().map(|s| s.cell).collect();
        let mut sorted = cells.clone();
        sorted.sort_unstable();
        assert_eq!(cells, sorted);

        let flat = TransportationProblem::new(
            problem.supply().to_vec(),
            problem.demand().to_vec(),
            DMatrix::from_element(problem.supply().len(), problem.demand().len(), 1i64),
            problem.objective(),
        );
        let baseline = Method::NorthwestCorner.solve(&flat).expect("balanced");
        assert_eq!(baseline.plan, solution.plan, "northwest corner must not look at costs");
    }
}

#[test]
fn minimum_cost_takes_the_cheapest_active_cell() {
    for problem in instances() {
        let solution = Method::MinimumCost.solve(&problem).expect("balanced");
        let sign = match problem.objective() {
            Objective::Minimize => 1,
            Objective::Maximize => -1,
        };
        let mut active = transport::ActiveSet::new(problem.supply(), problem.demand());
        for step in &solution.trace {
            let chosen = sign * problem.cost()[step.cell];
            for cell in active.cells() {
                assert!(chosen <= sign * problem.cost()[cell]);
            }
            active = step.active.clone();
        }
    }
}

#[test]
fn vogel_penalties_are_non_negative() {
    for problem in instances() {
        let solution = Method::Vogel.solve(&problem).expect("balanced");
        let mut previous = transport::ActiveSet::new(problem.supply(), problem.demand());
        for step in &solution.trace {
            let Diagnostics::Vogel(penalties) = &step.diagnostics else {
                panic!("vogel records penalties");
            };
            for (i, p) in penalties.rows.iter().enumerate() {
                assert_eq!(p.is_some(), previous.is_row_active(i));
                assert!(p.map_or(true, |v| v >= 0));
            }
            for (j, p) in penalties.cols.iter().enumerate() {
                assert_eq!(p.is_some(), previous.is_col_active(j));
                assert!(p.map_or(true, |v| v >= 0));
            }
            previous = step.active.clone();
        }
    }
}

#[test]
fn vogel_is_no_worse_than_northwest_here() {
    for problem in instances().into_iter().filter(|p| p.objective() == Objective::Minimize) {
        let vogel = Method::Vogel.solve(&problem).expect("balanced");
        let nw = Method::NorthwestCorner.solve(&problem).expect("balanced");
        assert!(vogel.total <= nw.total);
    }
}

fn permutations(n: usize) -> Vec<Vec<usize>> {
    if n == 0 {
        return vec![vec![]];
    }
    let mut out = Vec::new();
    for p in permutations(n - 1) {
        for k in 0..n {
            let mut q = p.clone();
            q.insert(k, n - 1);
            out.push(q);
        }
    }
    out
}

fn brute_force(costs: &DMatrix<f64>, objective: Objective) -> f64 {
    let n = costs.nrows();
    let totals = permutations(n)
        .into_iter()
        .map(|p| p.iter().enumerate().map(|(i, &j)| costs[(i, j)]).sum::<f64>());
    match objective {
        Objective::Minimize => totals.fold(f64::INFINITY, f64::min),
        Objective::Maximize => totals.fold(f64::NEG_INFINITY, f64::max),
    }
}

#[test]
fn hungarian_matches_brute_force_on_random_matrices() {
    init();
    for n in 1..=6 {
        for _ in 0..20 {
            let costs = DMatrix::<f64>::new_random(n, n);
            for objective in [Objective::Minimize, Objective::Maximize] {
                let problem = AssignmentProblem::new(costs.clone(), objective);
                let solution = hungarian::solve(&problem).expect("exact rule converges");
                assert!(solution.assignment.is_permutation());
                assert!((solution.total - solution.assignment.cost_under(&costs)).abs() < 1e-12);
                assert!((solution.total - brute_force(&costs, objective)).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn hungarian_on_integer_matrices() {
    #[rustfmt::skip]
    let cases: [(Objective, [i64; 16]); 2] = [
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
        let problem = AssignmentProblem::from_row_slice(4, &entries, objective).expect("square");
        let costs = problem.cost().map(|v| v as f64);
        for rule in [CoverRule::Exact, CoverRule::Greedy] {
            let solver = HungarianSolver::new(HungarianConfig::default().with_rule(rule));
            let Ok(solution) = solver.solve(&problem) else {
                assert_eq!(rule, CoverRule::Greedy, "only the greedy rule may give up");
                continue;
            };
            assert!(solution.assignment.is_permutation());
            assert_eq!(solution.total as f64, brute_force(&costs, objective));
        }
    }
}

#[test]
fn greedy_rule_is_exact_whenever_it_finishes() {
    for n in 2..=5 {
        for _ in 0..30 {
            let costs = DMatrix::<f64>::new_random(n, n).map(|v| (v * 10.).floor());
            let problem = AssignmentProblem::new(costs.clone(), Objective::Minimize);
            let greedy = HungarianSolver::new(HungarianConfig::default().with_rule(CoverRule::Greedy));
            match greedy.solve(&problem) {
                Ok(solution) => {
                    assert!(solution.assignment.is_permutation());
                    assert!((solution.total - brute_force(&costs, Objective::Minimize)).abs() < 1e-9);
                }
                Err(transport::SolveError::NonConvergence { partial, .. }) => {
                    let transport::Partial::Assignment(partial) = *partial else {
                        panic!("assignment solver returns an assignment");
                    };
                    assert!(partial.assignment.len() < n);
                }
                Err(other) => panic!("unexpected {other}"),
            }
        }
    }
}

#[cfg(feature = "serde")]
#[test]
fn solutions_serialize_to_json() {
    let problem = TransportationProblem::from_row_slice(vec![10, 10], vec![10, 10], &[1, 2, 3, 4], Objective::Minimize)
        .expect("2x2");
    let solution = Method::Vogel.solve(&problem).expect("balanced");
    let json = serde_json::to_string(&solution).expect("serializable");
    let back: transport::TransportationSolution<i32> = serde_json::from_str(&json).expect("round trip");
    assert_eq!(back, solution);
}
