//! Route tables and the route resolver
//!
//! Each stage has a table from access code to an ordered permutation of the
//! stage's waypoints, terminated by the stage-complete sentinel.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::config::ConfigError;

/// Numeric sentinel used in route definitions to mark the end of a stage
pub const STAGE_COMPLETE_CODE: u8 = 0;

/// Top-level quest phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Stage1,
    Stage2,
}

impl Stage {
    pub fn waypoints(self) -> &'static [Waypoint] {
        match self {
            Stage::Stage1 => &[
                Waypoint::Malevich,
                Waypoint::Kazan,
                Waypoint::Promobot,
                Waypoint::Orbion,
            ],
            Stage::Stage2 => &[
                Waypoint::ArPaintings,
                Waypoint::Hoversurf,
                Waypoint::Ovision,
                Waypoint::TrueFalse,
                Waypoint::Motorica,
                Waypoint::ArSuit,
            ],
        }
    }
}

/// A themed sub-activity within a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waypoint {
    // Stage 1
    Malevich,
    Kazan,
    Promobot,
    Orbion,
    // Stage 2
    ArPaintings,
    Hoversurf,
    Ovision,
    TrueFalse,
    Motorica,
    ArSuit,
}

impl Waypoint {
    /// Map a route-definition number to a waypoint of `stage`.
    ///
    /// Numbering follows the printed route cards handed to the groups, so it
    /// is stage-local: `1` is Malevich in stage 1 but AR paintings in stage 2.
    pub fn from_number(stage: Stage, number: u8) -> Option<Self> {
        let index = usize::from(number).checked_sub(1)?;
        stage.waypoints().get(index).copied()
    }

    pub fn stage(self) -> Stage {
        match self {
            Waypoint::Malevich | Waypoint::Kazan | Waypoint::Promobot | Waypoint::Orbion => {
                Stage::Stage1
            }
            _ => Stage::Stage2,
        }
    }
}

/// One element of a resolved route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStep {
    Waypoint(Waypoint),
    StageComplete,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("Unknown route code {code:?} for {stage:?}")]
    UnknownRoute { stage: Stage, code: String },
}

/// Validated route table for a single stage
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: BTreeMap<String, Vec<RouteStep>>,
}

impl RouteTable {
    /// Build a table from numeric definitions, rejecting anything that is not
    /// a permutation of the stage's waypoints followed by exactly one sentinel.
    pub fn from_numbers(
        stage: Stage,
        definitions: &BTreeMap<String, Vec<u8>>,
    ) -> Result<Self, ConfigError> {
        if definitions.is_empty() {
            return Err(ConfigError::EmptyRouteTable(stage));
        }

        let expected: BTreeSet<Waypoint> = stage.waypoints().iter().copied().collect();
        let mut routes = BTreeMap::new();

        for (code, numbers) in definitions {
            let invalid = |reason: &str| ConfigError::InvalidRoute {
                stage,
                code: code.clone(),
                reason: reason.to_string(),
            };

            let Some((&last, body)) = numbers.split_last() else {
                return Err(invalid("route is empty"));
            };
            if last != STAGE_COMPLETE_CODE {
                return Err(invalid("route must end with the stage-complete sentinel"));
            }

            let mut steps = Vec::with_capacity(numbers.len());
            let mut seen = BTreeSet::new();
            for &number in body {
                if number == STAGE_COMPLETE_CODE {
                    return Err(invalid("sentinel may only appear at the end"));
                }
                let waypoint = Waypoint::from_number(stage, number)
                    .ok_or_else(|| invalid(&format!("unknown waypoint number {number}")))?;
                if !seen.insert(waypoint) {
                    return Err(invalid(&format!("waypoint {waypoint:?} appears twice")));
                }
                steps.push(RouteStep::Waypoint(waypoint));
            }
            if seen != expected {
                return Err(invalid("route does not visit every waypoint of the stage"));
            }
            steps.push(RouteStep::StageComplete);

            routes.insert(code.clone(), steps);
        }

        Ok(Self { routes })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.routes.contains_key(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn sequence(&self, code: &str) -> Option<&[RouteStep]> {
        self.routes.get(code).map(Vec::as_slice)
    }
}

/// Both stage tables
#[derive(Debug, Clone)]
pub struct RouteBook {
    stage1: RouteTable,
    stage2: RouteTable,
}

impl RouteBook {
    pub fn new(stage1: RouteTable, stage2: RouteTable) -> Self {
        Self { stage1, stage2 }
    }

    pub fn table(&self, stage: Stage) -> &RouteTable {
        match stage {
            Stage::Stage1 => &self.stage1,
            Stage::Stage2 => &self.stage2,
        }
    }

    /// Resolve the waypoint at `queue` for the given stage and code.
    ///
    /// Pure: the same inputs always give the same step. Positions past the
    /// end of the stored sequence resolve to `StageComplete`.
    pub fn resolve(&self, stage: Stage, code: &str, queue: usize) -> Result<RouteStep, RouteError> {
        let sequence = self
            .table(stage)
            .sequence(code)
            .ok_or_else(|| RouteError::UnknownRoute {
                stage,
                code: code.to_string(),
            })?;
        Ok(sequence
            .get(queue)
            .copied()
            .unwrap_or(RouteStep::StageComplete))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::builtin;

    fn book() -> RouteBook {
        RouteBook::new(
            RouteTable::from_numbers(Stage::Stage1, &builtin::stage1_routes()).unwrap(),
            RouteTable::from_numbers(Stage::Stage2, &builtin::stage2_routes()).unwrap(),
        )
    }

    fn defs(code: &str, seq: &[u8]) -> BTreeMap<String, Vec<u8>> {
        BTreeMap::from([(code.to_string(), seq.to_vec())])
    }

    #[test]
    fn test_code_1567_walks_stage1_in_order() {
        let book = book();
        let expected = [
            RouteStep::Waypoint(Waypoint::Malevich),
            RouteStep::Waypoint(Waypoint::Kazan),
            RouteStep::Waypoint(Waypoint::Promobot),
            RouteStep::Waypoint(Waypoint::Orbion),
            RouteStep::StageComplete,
        ];
        for (queue, step) in expected.iter().enumerate() {
            assert_eq!(book.resolve(Stage::Stage1, "1567", queue).unwrap(), *step);
        }
    }

    #[test]
    fn test_exhausted_sequence_is_stage_complete() {
        let book = book();
        assert_eq!(
            book.resolve(Stage::Stage2, "8956", 42).unwrap(),
            RouteStep::StageComplete
        );
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let book = book();
        assert_eq!(
            book.resolve(Stage::Stage1, "8956", 0),
            Err(RouteError::UnknownRoute {
                stage: Stage::Stage1,
                code: "8956".to_string()
            })
        );
    }

    #[test]
    fn test_every_builtin_route_is_a_permutation() {
        let book = book();
        for stage in [Stage::Stage1, Stage::Stage2] {
            let table = book.table(stage);
            let expected: BTreeSet<_> = stage.waypoints().iter().copied().collect();
            for code in table.codes() {
                let seq = table.sequence(code).unwrap();
                assert_eq!(seq.last(), Some(&RouteStep::StageComplete));
                let visited: Vec<_> = seq[..seq.len() - 1]
                    .iter()
                    .map(|step| match step {
                        RouteStep::Waypoint(w) => *w,
                        RouteStep::StageComplete => panic!("sentinel inside route {code}"),
                    })
                    .collect();
                assert_eq!(visited.len(), expected.len());
                assert_eq!(visited.into_iter().collect::<BTreeSet<_>>(), expected);
            }
        }
    }

    #[test]
    fn test_rejects_duplicate_waypoint() {
        let err = RouteTable::from_numbers(Stage::Stage1, &defs("1111", &[1, 1, 3, 4, 0]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRoute { .. }));
    }

    #[test]
    fn test_rejects_missing_sentinel_and_omissions() {
        assert!(RouteTable::from_numbers(Stage::Stage1, &defs("1", &[1, 2, 3, 4])).is_err());
        assert!(RouteTable::from_numbers(Stage::Stage1, &defs("1", &[1, 2, 3, 0])).is_err());
        assert!(RouteTable::from_numbers(Stage::Stage1, &defs("1", &[1, 0, 2, 3, 4, 0])).is_err());
        assert!(RouteTable::from_numbers(Stage::Stage1, &defs("1", &[1, 2, 3, 7, 0])).is_err());
        assert!(RouteTable::from_numbers(Stage::Stage1, &BTreeMap::new()).is_err());
    }

    #[test]
    fn test_waypoint_numbers_are_stage_local() {
        assert_eq!(Waypoint::from_number(Stage::Stage1, 1), Some(Waypoint::Malevich));
        assert_eq!(Waypoint::from_number(Stage::Stage2, 1), Some(Waypoint::ArPaintings));
        assert_eq!(Waypoint::from_number(Stage::Stage2, 4), Some(Waypoint::TrueFalse));
        assert_eq!(Waypoint::from_number(Stage::Stage1, 5), None);
        assert_eq!(Waypoint::from_number(Stage::Stage1, 0), None);
        assert_eq!(Waypoint::ArSuit.stage(), Stage::Stage2);
    }
}
