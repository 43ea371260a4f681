//! Boolean composition of predicates.
//!
//! Every combinator evaluates its inputs in order and stops at the first
//! result that decides the outcome. An error from an input ends
//! evaluation and is returned as is.

use crate::predicate::Predicate;

fn join_labels(name: &str, predicates: &[Predicate]) -> String {
    let labels: Vec<&str> = predicates.iter().map(Predicate::label).collect();
    format!("{name}({})", labels.join(", "))
}

/// True when every predicate is true. Empty input is true.
pub fn all_of<I>(predicates: I) -> Predicate
where
    I: IntoIterator<Item = Predicate>,
{
    let predicates: Vec<Predicate> = predicates.into_iter().collect();
    let label = join_labels("all_of", &predicates);
    Predicate::try_new(move |record| {
        for predicate in &predicates {
            if !predicate.eval(record)? {
                return Ok(false);
            }
        }
        Ok(true)
    })
    .with_label(label)
}

/// True when at least one predicate is true. Empty input is false.
pub fn any_of<I>(predicates: I) -> Predicate
where
    I: IntoIterator<Item = Predicate>,
{
    let predicates: Vec<Predicate> = predicates.into_iter().collect();
    let label = join_labels("any_of", &predicates);
    Predicate::try_new(move |record| {
        for predicate in &predicates {
            if predicate.eval(record)? {
                return Ok(true);
            }
        }
        Ok(false)
    })
    .with_label(label)
}

/// True when no predicate is true. Empty input is true.
pub fn none_of<I>(predicates: I) -> Predicate
where
    I: IntoIterator<Item = Predicate>,
{
    let predicates: Vec<Predicate> = predicates.into_iter().collect();
    let label = join_labels("none_of", &predicates);
    negate(any_of(predicates)).with_label(label)
}

/// Logical negation.
pub fn negate(predicate: Predicate) -> Predicate {
    let label = format!("not({})", predicate.label());
    Predicate::try_new(move |record| Ok(!predicate.eval(record)?)).with_label(label)
}
