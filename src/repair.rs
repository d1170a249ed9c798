//! The repair engine: restores the activation invariant for one
//! row after a mutation or restart.

use rand::Rng;

use crate::table::CandidateTable;

/// Enforces, for a single `row`, that every parameter is `Na` iff at least
/// one of its activation conditions evaluates false.
///
/// Walks `schema().sorted_conditions()`, which groups conditions by
/// dependent parameter in topologically-sorted order, so that by the time a
/// parameter `P` is repaired, every ancestor of `P` already holds its final
/// value for this row.
pub fn repair_row<R: Rng + ?Sized>(table: &mut CandidateTable, row: usize, rng: &mut R) {
    let space = table.schema_arc();
    let sorted_conditions = space.sorted_conditions();

    let mut i = 0;
    while i < sorted_conditions.len() {
        let param_index = sorted_conditions[i].param_index;
        let mut all_satisfied = true;
        while i < sorted_conditions.len() && sorted_conditions[i].param_index == param_index {
            let cond = &sorted_conditions[i];
            let parent_value = table.get(row, cond.parent_index);
            if !cond.is_satisfied_by(&parent_value) {
                all_satisfied = false;
            }
            i += 1;
        }

        if !all_satisfied {
            table.set_na(row, param_index);
        } else if table.is_na(row, param_index) {
            table.set_random(row, param_index, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        space::{Condition, Parameter, SearchSpace},
        value::Value,
    };

    fn hierarchical_space() -> Arc<SearchSpace> {
        // a: Bool, b: Real[0,1] depends on a == true.
        Arc::new(
            SearchSpace::new(
                vec![Parameter::bool("a"), Parameter::real("b", 0.0, 1.0)],
                vec![Condition::equals(1, 0, Value::Bool(true))],
            )
            .unwrap(),
        )
    }

    #[test]
    fn dependent_becomes_na_when_condition_fails() {
        let space = hierarchical_space();
        let mut table = CandidateTable::new(space, 1);
        table.set(0, 0, Value::Bool(false));
        table.set(0, 1, Value::Real(0.3));
        let mut rng = crate::random::Random::testing();
        repair_row(&mut table, 0, &mut rng);
        assert!(table.is_na(0, 1));
    }

    #[test]
    fn dependent_is_randomized_when_newly_activated() {
        let space = hierarchical_space();
        let mut table = CandidateTable::new(space, 1);
        table.set(0, 0, Value::Bool(true));
        table.set_na(0, 1);
        let mut rng = crate::random::Random::testing();
        repair_row(&mut table, 0, &mut rng);
        assert!(!table.is_na(0, 1));
        let v = table.get(0, 1).as_real().unwrap();
        assert!((0.0..=1.0).contains(&v));
    }

    #[test]
    fn already_active_dependent_is_left_untouched() {
        let space = hierarchical_space();
        let mut table = CandidateTable::new(space, 1);
        table.set(0, 0, Value::Bool(true));
        table.set(0, 1, Value::Real(0.42));
        let mut rng = crate::random::Random::testing();
        repair_row(&mut table, 0, &mut rng);
        assert_eq!(table.get(0, 1).as_real().unwrap(), 0.42);
    }

    #[test]
    fn any_of_condition_requires_one_matching_value() {
        // k: Categorical{x,y,z}, m: Int[0,10] depends on k AnyOf {x, z}.
        let space = Arc::new(
            SearchSpace::new(
                vec![
                    Parameter::categorical("k", vec!["x".into(), "y".into(), "z".into()]),
                    Parameter::int("m", 0, 10),
                ],
                vec![Condition::any_of(1, 0, vec![Value::Cat(0), Value::Cat(2)])],
            )
            .unwrap(),
        );
        let mut table = CandidateTable::new(space, 1);
        let mut rng = crate::random::Random::testing();

        table.set(0, 0, Value::Cat(1)); // "y": condition fails
        table.set(0, 1, Value::Int(5));
        repair_row(&mut table, 0, &mut rng);
        assert!(table.is_na(0, 1));

        table.set(0, 0, Value::Cat(2)); // "z": condition holds
        repair_row(&mut table, 0, &mut rng);
        assert!(!table.is_na(0, 1));
        let v = table.get(0, 1).as_int().unwrap();
        assert!((0..=10).contains(&v));
    }

    #[test]
    fn conjunction_requires_all_conditions_to_hold() {
        let space = Arc::new(
            SearchSpace::new(
                vec![
                    Parameter::bool("a"),
                    Parameter::bool("b"),
                    Parameter::int("c", 0, 5),
                ],
                vec![
                    Condition::equals(2, 0, Value::Bool(true)),
                    Condition::equals(2, 1, Value::Bool(true)),
                ],
            )
            .unwrap(),
        );
        let mut table = CandidateTable::new(space, 1);
        let mut rng = crate::random::Random::testing();

        table.set(0, 0, Value::Bool(true));
        table.set(0, 1, Value::Bool(false));
        table.set(0, 2, Value::Int(3));
        repair_row(&mut table, 0, &mut rng);
        assert!(table.is_na(0, 2), "only one of two conditions holds");

        table.set(0, 1, Value::Bool(true));
        repair_row(&mut table, 0, &mut rng);
        assert!(!table.is_na(0, 2), "both conditions hold");
    }
}
