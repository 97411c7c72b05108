//! Built-in quest content
//!
//! Route cards are the ones printed for the event. Scripts and quiz questions
//! are short defaults meant to be replaced by a config file.

use crate::content::ContentEntry;
use crate::quiz::QuizQuestion;
use crate::state_machine::StateId;
use std::collections::BTreeMap;

fn routes(cards: &[(&str, &[u8])]) -> BTreeMap<String, Vec<u8>> {
    cards
        .iter()
        .map(|(code, numbers)| ((*code).to_string(), numbers.to_vec()))
        .collect()
}

pub fn stage1_routes() -> BTreeMap<String, Vec<u8>> {
    routes(&[
        ("1567", &[1, 2, 3, 4, 0]),
        ("2784", &[2, 3, 4, 1, 0]),
        ("3048", &[3, 4, 1, 2, 0]),
        ("4650", &[4, 1, 2, 3, 0]),
    ])
}

pub fn stage2_routes() -> BTreeMap<String, Vec<u8>> {
    routes(&[
        ("8956", &[1, 4, 2, 3, 5, 6, 0]),
        ("9568", &[2, 3, 4, 5, 6, 1, 0]),
        ("5689", &[3, 5, 1, 6, 4, 2, 0]),
        ("6895", &[5, 1, 6, 2, 3, 4, 0]),
    ])
}

fn script(entries: &[ScriptLine]) -> Vec<ContentEntry> {
    entries
        .iter()
        .map(|line| match *line {
            ScriptLine::Say(text) => ContentEntry::text(text),
            ScriptLine::Pause(secs) => ContentEntry::Delay(secs),
        })
        .collect()
}

enum ScriptLine {
    Say(&'static str),
    Pause(f64),
}

use ScriptLine::{Pause, Say};

/// Scripts keyed by the state they play on entry
pub fn scripts() -> BTreeMap<StateId, Vec<ContentEntry>> {
    let scripts: &[(StateId, &[ScriptLine])] = &[
        (
            StateId::AwaitingAccessCode,
            &[
                Say("Привет! Я робот-помощник, и мне нужна ваша помощь."),
                Say("Чтобы начать, введите код доступа с вашей карточки."),
            ],
        ),
        (
            StateId::AwaitingStage2Code,
            &[Say("Когда будете готовы ко второму этапу, введите новый код доступа.")],
        ),
        (
            StateId::Stage1Routing,
            &[
                Say("Код принят. Мои системы повреждены, и мне нужно восстановить ключ."),
                Say("Я буду прокладывать маршрут, а вы выполнять задания."),
            ],
        ),
        (
            StateId::MalevichCospaces,
            &[
                Say("Вы у картины. Откройте сцену и найдите автора."),
                Pause(2.0),
                Say("Напишите его фамилию."),
            ],
        ),
        (
            StateId::MalevichEnd,
            &[Say("Верно! Теперь найдите код на обороте карточки и введите его.")],
        ),
        (
            StateId::KazanCospaces,
            &[Say("Сколько ядер застряло в стене собора? Ответьте цифрой.")],
        ),
        (StateId::KazanEnd, &[Say("Отлично! Введите код со стенда.")]),
        (
            StateId::PromobotEnd,
            &[Say("У стенда вас ждёт робот. Спросите, как его зовут, и напишите ответ.")],
        ),
        (
            StateId::OrbionEnd,
            &[Say("Найдите спутник на выставке и напишите его название.")],
        ),
        (
            StateId::ArArtFindDoctor,
            &[Say("Наведите планшет на картину и напишите её название.")],
        ),
        (
            StateId::ArArtEnd,
            &[Say("Теперь найдите учёного на картине. О чём он рассказывает?")],
        ),
        (
            StateId::ArSuitEnd,
            &[Say("Примерьте костюм. Для какой профессии он создан?")],
        ),
        (
            StateId::HoversurfCospaces,
            &[Say("Найдите летающий мотоцикл и напишите название компании.")],
        ),
        (
            StateId::HoversurfVideo,
            &[Say("Посмотрите видео и введите код из его конца.")],
        ),
        (
            StateId::HoversurfGlass,
            &[Say("В каком году выпустили первый серийный ховербайк?")],
        ),
        (
            StateId::HoversurfEnd,
            &[Say("Из какого стекла сделан шлем пилота?")],
        ),
        (
            StateId::OvisionCospaces,
            &[Say("Откройте сцену и найдите код на экране.")],
        ),
        (
            StateId::OvisionVideo,
            &[Say("Посмотрите видео и введите год, который в нём назван.")],
        ),
        (
            StateId::OvisionEnd,
            &[Say("Сколько камер нужно системе, чтобы узнать лицо? Ответьте цифрой.")],
        ),
        (
            StateId::MotoricaCospaces,
            &[Say("Откройте сцену с протезом и введите код.")],
        ),
        (
            StateId::MotoricaVideo,
            &[
                Say("Посмотрите видео о том, как работает бионическая рука."),
                Pause(6.0),
                Say("Введите код, который появится в конце."),
            ],
        ),
        (
            StateId::MotoricaEnd,
            &[Say("Сколько схватов умеет протез? Ответьте цифрой.")],
        ),
        (
            StateId::QuizAsking,
            &[
                Say("Викторина! На стенде спрятаны коды вопросов."),
                Say("Введите код вопроса."),
            ],
        ),
    ];

    scripts
        .iter()
        .map(|(state, lines)| (*state, script(lines)))
        .collect()
}

fn question(
    prompt: &str,
    correct_answer: bool,
    feedback_if_correct: &str,
    feedback_if_incorrect: &str,
) -> QuizQuestion {
    QuizQuestion {
        prompt: prompt.to_string(),
        correct_answer,
        feedback_if_correct: feedback_if_correct.to_string(),
        feedback_if_incorrect: feedback_if_incorrect.to_string(),
    }
}

pub fn quiz() -> BTreeMap<String, QuizQuestion> {
    BTreeMap::from([
        (
            "101".to_string(),
            question(
                "Первый искусственный спутник Земли запустили в 1957 году.",
                true,
                "Правильно! 4 октября 1957 года.",
                "Это правда: спутник запустили 4 октября 1957 года.",
            ),
        ),
        (
            "202".to_string(),
            question(
                "Звук распространяется в вакууме быстрее, чем в воздухе.",
                false,
                "Верно, в вакууме звук не распространяется вовсе.",
                "Нет, в вакууме звуку не через что распространяться.",
            ),
        ),
        (
            "303".to_string(),
            question(
                "Бионический протез может управляться сигналами мышц.",
                true,
                "Именно так работают миоэлектрические протезы.",
                "На самом деле может: датчики считывают сигналы мышц.",
            ),
        ),
    ])
}
