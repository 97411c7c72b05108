//! Quest state identifiers

use crate::route::{Stage, Waypoint};
use serde::{Deserialize, Serialize};

/// Every state a session can be in
///
/// Each waypoint is a short chain `begin -> steps -> end`; its `end` state
/// returns the session to the stage's routing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateId {
    // Stage 1
    AwaitingAccessCode,
    Stage1Routing,
    MalevichBegin,
    MalevichCospaces,
    MalevichEnd,
    KazanBegin,
    KazanCospaces,
    KazanEnd,
    PromobotBegin,
    PromobotEnd,
    OrbionBegin,
    OrbionEnd,
    Stage1Final,

    // Stage 2
    AwaitingStage2Code,
    Stage2Routing,
    ArArtBegin,
    ArArtFindDoctor,
    ArArtEnd,
    ArSuitBegin,
    ArSuitEnd,
    HoversurfBegin,
    HoversurfCospaces,
    HoversurfVideo,
    HoversurfGlass,
    HoversurfEnd,
    OvisionBegin,
    OvisionCospaces,
    OvisionVideo,
    OvisionEnd,
    MotoricaBegin,
    MotoricaCospaces,
    MotoricaVideo,
    MotoricaEnd,
    QuizBegin,
    QuizAsking,
    QuizAwaitingAnswer,

    /// Terminal: the closing dialogue has been played
    OverallComplete,
}

impl StateId {
    pub const ALL: [StateId; 37] = [
        StateId::AwaitingAccessCode,
        StateId::Stage1Routing,
        StateId::MalevichBegin,
        StateId::MalevichCospaces,
        StateId::MalevichEnd,
        StateId::KazanBegin,
        StateId::KazanCospaces,
        StateId::KazanEnd,
        StateId::PromobotBegin,
        StateId::PromobotEnd,
        StateId::OrbionBegin,
        StateId::OrbionEnd,
        StateId::Stage1Final,
        StateId::AwaitingStage2Code,
        StateId::Stage2Routing,
        StateId::ArArtBegin,
        StateId::ArArtFindDoctor,
        StateId::ArArtEnd,
        StateId::ArSuitBegin,
        StateId::ArSuitEnd,
        StateId::HoversurfBegin,
        StateId::HoversurfCospaces,
        StateId::HoversurfVideo,
        StateId::HoversurfGlass,
        StateId::HoversurfEnd,
        StateId::OvisionBegin,
        StateId::OvisionCospaces,
        StateId::OvisionVideo,
        StateId::OvisionEnd,
        StateId::MotoricaBegin,
        StateId::MotoricaCospaces,
        StateId::MotoricaVideo,
        StateId::MotoricaEnd,
        StateId::QuizBegin,
        StateId::QuizAsking,
        StateId::QuizAwaitingAnswer,
        StateId::OverallComplete,
    ];

    /// Entry state of a waypoint's chain
    pub fn begin_of(waypoint: Waypoint) -> Self {
        match waypoint {
            Waypoint::Malevich => StateId::MalevichBegin,
            Waypoint::Kazan => StateId::KazanBegin,
            Waypoint::Promobot => StateId::PromobotBegin,
            Waypoint::Orbion => StateId::OrbionBegin,
            Waypoint::ArPaintings => StateId::ArArtBegin,
            Waypoint::Hoversurf => StateId::HoversurfBegin,
            Waypoint::Ovision => StateId::OvisionBegin,
            Waypoint::TrueFalse => StateId::QuizBegin,
            Waypoint::Motorica => StateId::MotoricaBegin,
            Waypoint::ArSuit => StateId::ArSuitBegin,
        }
    }

    /// The waypoint whose chain contains this state
    pub fn waypoint(self) -> Option<Waypoint> {
        Some(match self {
            Self::MalevichBegin | Self::MalevichCospaces | Self::MalevichEnd => Waypoint::Malevich,
            Self::KazanBegin | Self::KazanCospaces | Self::KazanEnd => Waypoint::Kazan,
            Self::PromobotBegin | Self::PromobotEnd => Waypoint::Promobot,
            Self::OrbionBegin | Self::OrbionEnd => Waypoint::Orbion,
            Self::ArArtBegin | Self::ArArtFindDoctor | Self::ArArtEnd => Waypoint::ArPaintings,
            Self::ArSuitBegin | Self::ArSuitEnd => Waypoint::ArSuit,
            Self::HoversurfBegin
            | Self::HoversurfCospaces
            | Self::HoversurfVideo
            | Self::HoversurfGlass
            | Self::HoversurfEnd => Waypoint::Hoversurf,
            Self::OvisionBegin
            | Self::OvisionCospaces
            | Self::OvisionVideo
            | Self::OvisionEnd => Waypoint::Ovision,
            Self::MotoricaBegin
            | Self::MotoricaCospaces
            | Self::MotoricaVideo
            | Self::MotoricaEnd => Waypoint::Motorica,
            Self::QuizBegin | Self::QuizAsking | Self::QuizAwaitingAnswer => Waypoint::TrueFalse,
            Self::AwaitingAccessCode
            | Self::Stage1Routing
            | Self::Stage1Final
            | Self::AwaitingStage2Code
            | Self::Stage2Routing
            | Self::OverallComplete => return None,
        })
    }

    pub fn stage(self) -> Stage {
        match self {
            StateId::AwaitingAccessCode | StateId::Stage1Routing | StateId::Stage1Final => {
                Stage::Stage1
            }
            StateId::AwaitingStage2Code | StateId::Stage2Routing | StateId::OverallComplete => {
                Stage::Stage2
            }
            other => other
                .waypoint()
                .map_or(Stage::Stage1, Waypoint::stage),
        }
    }

    /// Routing state for a stage
    pub fn routing(stage: Stage) -> Self {
        match stage {
            Stage::Stage1 => StateId::Stage1Routing,
            Stage::Stage2 => StateId::Stage2Routing,
        }
    }

    #[cfg(test)]
    pub fn is_terminal(self) -> bool {
        matches!(self, StateId::OverallComplete)
    }
}
