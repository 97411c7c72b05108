//! Transition table
//!
//! Pure: given the same session, event and catalog, evaluation always yields
//! the same outcome and performs no I/O.

use super::dialogue::{
    AR_ART_DONE, AR_SUIT_DONE, COMPUTING_ROUTE, DATA_SAVED, FINALE_LAUNCH, FINALE_SUCCESS,
    HOVERSURF_DONE, KAZAN_DONE, LABEL_FALSE, LABEL_FORWARD, LABEL_LETS_GO, LABEL_ONWARD,
    LABEL_TRUE, LABEL_YES, MALEVICH_DONE, MOTORICA_DONE, MOTORICA_GREAT, ORBION_DONE,
    OVISION_DONE, PROMOBOT_DONE, QUIZ_ALREADY_ANSWERED, QUIZ_DONE, QUIZ_NEXT_CODE, READY,
    READY_STAGE2, ROUTE_FOUND, STAGE1_KEY_HINT, STAGE2_CONNECTED, TOKEN_LOC, TOKEN_YES,
};
use super::effect::Effect;
use super::event::InputEvent;
use super::guard::{Guard, GuardToken};
use super::state::StateId;
use crate::catalog::Catalog;
use crate::config::ConfigError;
use crate::content::Button;
use crate::quiz::{answer_token, parse_answer_token, AnswerVerdict, AskOutcome};
use crate::route::{RouteError, RouteStep, Stage};
use crate::session::Session;
#[cfg(test)]
use std::collections::BTreeSet;
use thiserror::Error;

/// Reply to any input no row accepts
pub const FALLBACK_TEXT: &str =
    "Не все мои системы внорме, я не понял, что Вы сказали... Возможно, Вы допустили ошибку.";

const MALEVICH_WORDS: &[&str] = &["малевич", "Малевич", "malevich", "Malevich"];
const CORE_WORDS: &[&str] = &["1", "2", "1 ядро", "2 ядро", "1 Ядро", "2 Ядро"];
const PROMOBOT_WORDS: &[&str] = &[
    "промобот", "Промобот", "ПРОМОБОТ", "promobot", "Promobot", "PROMOBOT",
];
const ORBION_WORDS: &[&str] = &["орбион", "Орбион", "orbion", "Orbion"];
const WINDOW_WORDS: &[&str] = &["окно в прошлое", "Окно в прошлое", "ОКНО В ПРОШЛОЕ"];
const LIGHT_WORDS: &[&str] = &["физика света", "Физика света", "ФИЗИКА СВЕТА"];
const FIREFIGHTER_WORDS: &[&str] = &["пожарный", "Пожарный"];
const HOVERSURF_WORDS: &[&str] = &[
    "ховерсерф", "Ховерсерф", "хуверсерф", "Хуверсерф", "hoversurf", "Hoversurf", "HOVERSURF",
];
const GLASS_WORDS: &[&str] = &["термо глас", "Термо глас", "ТЕРМО ГЛАС"];

/// Result of a state transition
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    pub new_state: StateId,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: StateId) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    pub fn has_mutation(&self) -> bool {
        self.effects.iter().any(Effect::is_mutation)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Transition(TransitionResult),
    /// No row accepted the input; nothing changes
    Unhandled,
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("Session is routing in {0:?} without an access code")]
    NoRouteCode(Stage),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub(crate) type Handler =
    fn(&Session, &InputEvent, &Catalog) -> Result<TransitionResult, TransitionError>;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    /// Create a fresh session at the access code prompt
    Start,
    /// Accept an access code and open the stage
    EnterStage(Stage),
    /// Resolve the next waypoint
    Route(Stage),
    /// Move along a waypoint chain, playing the target's script
    Step { to: StateId },
    /// Close a waypoint and return to routing
    FinishWaypoint {
        text: &'static str,
        label: &'static str,
    },
    Handler(Handler),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Rule {
    /// `None` matches in every state, and with no session at all
    from: Option<StateId>,
    guard: Guard,
    action: Action,
}

impl Rule {
    pub(crate) fn any(guard: Guard, action: Action) -> Self {
        Self {
            from: None,
            guard,
            action,
        }
    }

    pub(crate) fn on(from: StateId, guard: Guard, action: Action) -> Self {
        Self {
            from: Some(from),
            guard,
            action,
        }
    }

    fn applies_in(&self, state: Option<StateId>) -> bool {
        self.from.is_none() || self.from == state
    }
}

/// The validated, static table of `(state | any, guard) -> action` rows
#[derive(Debug, Clone)]
pub struct TransitionTable {
    rules: Vec<Rule>,
}

impl TransitionTable {
    pub fn new(catalog: &Catalog) -> Result<Self, ConfigError> {
        Self::from_rules(quest_rules(), catalog)
    }

    /// Build a table, rejecting any input two rows of one state would accept
    pub(crate) fn from_rules(rules: Vec<Rule>, catalog: &Catalog) -> Result<Self, ConfigError> {
        for state in StateId::ALL {
            let active: Vec<&Rule> = rules
                .iter()
                .filter(|rule| rule.applies_in(Some(state)))
                .collect();
            for (index, rule) in active.iter().enumerate() {
                for token in rule.guard.tokens(catalog) {
                    let event = token.to_event();
                    let overlaps = active
                        .iter()
                        .enumerate()
                        .any(|(other, candidate)| {
                            other != index && candidate.guard.matches(&event, catalog)
                        });
                    if overlaps {
                        return Err(ConfigError::OverlappingGuard {
                            state,
                            token: token.to_string(),
                        });
                    }
                }
            }
        }
        Ok(Self { rules })
    }

    /// Every concrete input some row accepts in `state`
    #[cfg(test)]
    pub fn accepted_tokens(&self, state: StateId, catalog: &Catalog) -> BTreeSet<GuardToken> {
        self.rules
            .iter()
            .filter(|rule| rule.applies_in(Some(state)))
            .flat_map(|rule| rule.guard.tokens(catalog))
            .collect()
    }

    /// States with at least one row of their own
    #[cfg(test)]
    pub fn handled_states(&self) -> BTreeSet<StateId> {
        self.rules.iter().filter_map(|rule| rule.from).collect()
    }

    pub fn evaluate(
        &self,
        session: Option<&Session>,
        event: &InputEvent,
        catalog: &Catalog,
    ) -> Result<Outcome, TransitionError> {
        let state = session.map(|session| session.state);
        let Some(rule) = self
            .rules
            .iter()
            .find(|rule| rule.applies_in(state) && rule.guard.matches(event, catalog))
        else {
            return Ok(Outcome::Unhandled);
        };

        let result = match (rule.action, session) {
            (Action::Start, _) => start(),
            (action, Some(session)) => run(action, session, event, catalog)?,
            (_, None) => return Ok(Outcome::Unhandled),
        };
        Ok(Outcome::Transition(result))
    }
}

fn quest_rules() -> Vec<Rule> {
    use StateId::{
        ArArtBegin, ArArtEnd, ArArtFindDoctor, ArSuitBegin, ArSuitEnd, AwaitingAccessCode,
        AwaitingStage2Code, HoversurfBegin, HoversurfCospaces, HoversurfEnd, HoversurfGlass,
        HoversurfVideo, KazanBegin, KazanCospaces, KazanEnd, MalevichBegin, MalevichCospaces,
        MalevichEnd, MotoricaBegin, MotoricaCospaces, MotoricaEnd, MotoricaVideo, OrbionBegin,
        OrbionEnd, OvisionBegin, OvisionCospaces, OvisionEnd, OvisionVideo, PromobotBegin,
        PromobotEnd, QuizAsking, QuizAwaitingAnswer, QuizBegin, Stage1Final, Stage1Routing,
        Stage2Routing,
    };

    let loc = Guard::Button(TOKEN_LOC);

    vec![
        Rule::any(Guard::StartCommand, Action::Start),
        // Stage 1
        Rule::on(
            AwaitingAccessCode,
            Guard::RouteCode(Stage::Stage1),
            Action::EnterStage(Stage::Stage1),
        ),
        Rule::on(Stage1Routing, Guard::Button(TOKEN_YES), Action::Route(Stage::Stage1)),
        Rule::on(MalevichBegin, loc, step(MalevichCospaces)),
        Rule::on(MalevichCospaces, Guard::Text(MALEVICH_WORDS), step(MalevichEnd)),
        Rule::on(MalevichEnd, Guard::Text(&["0798"]), finish(MALEVICH_DONE, LABEL_LETS_GO)),
        Rule::on(KazanBegin, loc, step(KazanCospaces)),
        Rule::on(KazanCospaces, Guard::Text(CORE_WORDS), step(KazanEnd)),
        Rule::on(KazanEnd, Guard::Text(&["4948"]), finish(KAZAN_DONE, LABEL_ONWARD)),
        Rule::on(PromobotBegin, loc, step(PromobotEnd)),
        Rule::on(PromobotEnd, Guard::Text(PROMOBOT_WORDS), finish(PROMOBOT_DONE, LABEL_ONWARD)),
        Rule::on(OrbionBegin, loc, step(OrbionEnd)),
        Rule::on(OrbionEnd, Guard::Text(ORBION_WORDS), finish(ORBION_DONE, LABEL_ONWARD)),
        Rule::on(Stage1Final, loc, Action::Handler(stage1_final)),
        // Stage 2
        Rule::on(
            AwaitingStage2Code,
            Guard::RouteCode(Stage::Stage2),
            Action::EnterStage(Stage::Stage2),
        ),
        Rule::on(Stage2Routing, Guard::Button(TOKEN_YES), Action::Route(Stage::Stage2)),
        Rule::on(ArArtBegin, loc, step(ArArtFindDoctor)),
        Rule::on(ArArtFindDoctor, Guard::Text(WINDOW_WORDS), step(ArArtEnd)),
        Rule::on(ArArtEnd, Guard::Text(LIGHT_WORDS), finish(AR_ART_DONE, LABEL_ONWARD)),
        Rule::on(ArSuitBegin, loc, step(ArSuitEnd)),
        Rule::on(ArSuitEnd, Guard::Text(FIREFIGHTER_WORDS), finish(AR_SUIT_DONE, LABEL_ONWARD)),
        Rule::on(HoversurfBegin, loc, step(HoversurfCospaces)),
        Rule::on(HoversurfCospaces, Guard::Text(HOVERSURF_WORDS), step(HoversurfVideo)),
        Rule::on(HoversurfVideo, Guard::Text(&["2354"]), step(HoversurfGlass)),
        Rule::on(HoversurfGlass, Guard::Text(&["2021"]), step(HoversurfEnd)),
        Rule::on(HoversurfEnd, Guard::Text(GLASS_WORDS), finish(HOVERSURF_DONE, LABEL_ONWARD)),
        Rule::on(OvisionBegin, loc, step(OvisionCospaces)),
        Rule::on(OvisionCospaces, Guard::Text(&["6776"]), step(OvisionVideo)),
        Rule::on(OvisionVideo, Guard::Text(&["1980"]), step(OvisionEnd)),
        Rule::on(OvisionEnd, Guard::Text(&["2"]), Action::Handler(ovision_end)),
        Rule::on(MotoricaBegin, loc, step(MotoricaCospaces)),
        Rule::on(MotoricaCospaces, Guard::Text(&["5445"]), step(MotoricaVideo)),
        Rule::on(MotoricaVideo, Guard::Text(&["2904"]), step(MotoricaEnd)),
        Rule::on(MotoricaEnd, Guard::Text(&["3"]), Action::Handler(motorica_end)),
        Rule::on(QuizBegin, loc, Action::Handler(quiz_begin)),
        Rule::on(QuizAsking, Guard::QuizKey, Action::Handler(quiz_ask)),
        Rule::on(QuizAwaitingAnswer, Guard::QuizAnswer, Action::Handler(quiz_answer)),
    ]
}

fn step(to: StateId) -> Action {
    Action::Step { to }
}

fn finish(text: &'static str, label: &'static str) -> Action {
    Action::FinishWaypoint { text, label }
}

fn run(
    action: Action,
    session: &Session,
    event: &InputEvent,
    catalog: &Catalog,
) -> Result<TransitionResult, TransitionError> {
    match action {
        Action::Start => Ok(start()),
        Action::EnterStage(stage) => enter_stage(stage, event, catalog),
        Action::Route(stage) => route(stage, session, catalog),
        Action::Step { to } => Ok(TransitionResult::new(to).with_effect(Effect::play(to))),
        Action::FinishWaypoint { text, label } => Ok(finish_waypoint(session, text, label)),
        Action::Handler(handler) => handler(session, event, catalog),
    }
}

fn start() -> TransitionResult {
    TransitionResult::new(StateId::AwaitingAccessCode)
        .with_effect(Effect::StartSession)
        .with_effect(Effect::play(StateId::AwaitingAccessCode))
}

fn unexpected(event: &InputEvent) -> TransitionError {
    TransitionError::InvalidTransition(format!("guard accepted unexpected input {event:?}"))
}

fn enter_stage(
    stage: Stage,
    event: &InputEvent,
    catalog: &Catalog,
) -> Result<TransitionResult, TransitionError> {
    let code = event.as_text().ok_or_else(|| unexpected(event))?;
    let routing = StateId::routing(stage);
    let opened = TransitionResult::new(routing).with_effect(Effect::BeginStage {
        stage,
        code: code.to_string(),
    });

    Ok(match stage {
        Stage::Stage1 => opened.with_effects([
            Effect::play(routing),
            Effect::prompt(READY, LABEL_YES, TOKEN_YES),
        ]),
        Stage::Stage2 => opened.with_effects([
            Effect::say(STAGE2_CONNECTED),
            Effect::pause(catalog.interval),
            Effect::prompt(READY_STAGE2, LABEL_YES, TOKEN_YES),
        ]),
    })
}

fn route(
    stage: Stage,
    session: &Session,
    catalog: &Catalog,
) -> Result<TransitionResult, TransitionError> {
    let code = session
        .route_code
        .as_deref()
        .ok_or(TransitionError::NoRouteCode(stage))?;
    let step = catalog.routes.resolve(stage, code, session.queue)?;

    let found = [
        Effect::say(COMPUTING_ROUTE),
        Effect::pause(catalog.interval),
        Effect::prompt(ROUTE_FOUND, LABEL_FORWARD, TOKEN_LOC),
    ];

    Ok(match (step, stage) {
        (RouteStep::Waypoint(waypoint), _) => {
            TransitionResult::new(StateId::begin_of(waypoint)).with_effects(found)
        }
        (RouteStep::StageComplete, Stage::Stage1) => {
            TransitionResult::new(StateId::Stage1Final).with_effects(found)
        }
        (RouteStep::StageComplete, Stage::Stage2) => {
            TransitionResult::new(StateId::OverallComplete).with_effects([
                Effect::say(COMPUTING_ROUTE),
                Effect::say(FINALE_SUCCESS),
                Effect::pause(catalog.interval),
                Effect::say(FINALE_LAUNCH),
                Effect::Archive,
            ])
        }
    })
}

fn finish_waypoint(session: &Session, text: &str, label: &str) -> TransitionResult {
    TransitionResult::new(StateId::routing(session.state.stage())).with_effects([
        Effect::prompt(text, label, TOKEN_YES),
        Effect::AdvanceQueue,
    ])
}

#[allow(clippy::unnecessary_wraps)] // handler signature
fn stage1_final(
    _session: &Session,
    _event: &InputEvent,
    catalog: &Catalog,
) -> Result<TransitionResult, TransitionError> {
    Ok(
        TransitionResult::new(StateId::AwaitingStage2Code).with_effects([
            Effect::say(STAGE1_KEY_HINT),
            Effect::pause(catalog.interval),
            Effect::play(StateId::AwaitingStage2Code),
        ]),
    )
}

#[allow(clippy::unnecessary_wraps)] // handler signature
fn ovision_end(
    _session: &Session,
    _event: &InputEvent,
    catalog: &Catalog,
) -> Result<TransitionResult, TransitionError> {
    Ok(
        TransitionResult::new(StateId::Stage2Routing).with_effects([
            Effect::say(DATA_SAVED),
            Effect::pause(catalog.interval / 2),
            Effect::prompt(OVISION_DONE, LABEL_ONWARD, TOKEN_YES),
            Effect::AdvanceQueue,
        ]),
    )
}

#[allow(clippy::unnecessary_wraps)] // handler signature
fn motorica_end(
    _session: &Session,
    _event: &InputEvent,
    catalog: &Catalog,
) -> Result<TransitionResult, TransitionError> {
    Ok(
        TransitionResult::new(StateId::Stage2Routing).with_effects([
            Effect::say(DATA_SAVED),
            Effect::pause(catalog.interval),
            Effect::play(StateId::MotoricaVideo),
            Effect::say(MOTORICA_GREAT),
            Effect::pause(catalog.interval),
            Effect::prompt(MOTORICA_DONE, LABEL_ONWARD, TOKEN_YES),
            Effect::AdvanceQueue,
        ]),
    )
}

#[allow(clippy::unnecessary_wraps)] // handler signature
fn quiz_begin(
    _session: &Session,
    _event: &InputEvent,
    _catalog: &Catalog,
) -> Result<TransitionResult, TransitionError> {
    Ok(TransitionResult::new(StateId::QuizAsking)
        .with_effect(Effect::BeginQuiz)
        .with_effect(Effect::play(StateId::QuizAsking)))
}

fn quiz_ask(
    session: &Session,
    event: &InputEvent,
    catalog: &Catalog,
) -> Result<TransitionResult, TransitionError> {
    let key = event.as_text().ok_or_else(|| unexpected(event))?;

    match catalog.quiz.ask(&session.quiz, key) {
        AskOutcome::Question { key, question } => Ok(TransitionResult::new(
            StateId::QuizAwaitingAnswer,
        )
        .with_effect(Effect::Prompt {
            text: question.prompt.clone(),
            buttons: vec![
                Button::new(LABEL_TRUE, answer_token(key, true)),
                Button::new(LABEL_FALSE, answer_token(key, false)),
            ],
        })),
        // Notice only, the session keeps waiting for a key
        AskOutcome::AlreadyAnswered | AskOutcome::AllAnswered => Ok(TransitionResult::new(
            StateId::QuizAsking,
        )
        .with_effect(Effect::say(QUIZ_ALREADY_ANSWERED))),
        AskOutcome::UnknownQuestion => Err(unexpected(event)),
    }
}

fn quiz_answer(
    session: &Session,
    event: &InputEvent,
    catalog: &Catalog,
) -> Result<TransitionResult, TransitionError> {
    let (key, given) = event
        .as_button()
        .and_then(parse_answer_token)
        .ok_or_else(|| unexpected(event))?;
    let question = catalog.quiz.get(key).ok_or_else(|| unexpected(event))?;
    let verdict = catalog
        .quiz
        .judge(&session.quiz, key, given)
        .ok_or_else(|| unexpected(event))?;

    let Some(feedback) = question.feedback(verdict) else {
        // Stale button for an answered question: silent, nothing changes
        return Ok(TransitionResult::new(session.state));
    };

    let recorded = [
        Effect::RecordAnswer {
            question: key.to_string(),
            correct: verdict == AnswerVerdict::Correct,
        },
        Effect::say(feedback),
    ];

    if session.quiz.len() + 1 >= catalog.quiz.len() {
        Ok(TransitionResult::new(StateId::Stage2Routing)
            .with_effects(recorded)
            .with_effects([
                Effect::prompt(QUIZ_DONE, LABEL_ONWARD, TOKEN_YES),
                Effect::AdvanceQueue,
            ]))
    } else {
        Ok(TransitionResult::new(StateId::QuizAsking)
            .with_effects(recorded)
            .with_effect(Effect::say(QUIZ_NEXT_CODE)))
    }
}
