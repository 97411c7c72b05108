//! Fixed dialogue lines spoken around the scripted content

pub const TOKEN_YES: &str = "yes";
pub const TOKEN_LOC: &str = "loc";

pub const LABEL_YES: &str = "Да!";
pub const LABEL_FORWARD: &str = "Вперед!";
pub const LABEL_ONWARD: &str = "Едем дальше";
pub const LABEL_LETS_GO: &str = "Поехали!";
pub const LABEL_TRUE: &str = "Правда";
pub const LABEL_FALSE: &str = "Ложь";

pub const READY: &str = "Готовы?";
pub const READY_STAGE2: &str = "Ты готов?";
pub const STAGE2_CONNECTED: &str = "Я смог подключиться к сети Сколково и кое-что узнать.";
pub const COMPUTING_ROUTE: &str = "Вычисляю маршрут...";
pub const ROUTE_FOUND: &str = "Нашел!";

pub const STAGE1_KEY_HINT: &str = "Теперь чтобы я подключился к сети Сколково вам нужно ввести \
                                   все части ключа в той последовательности, что вы получили.";
pub const FINALE_SUCCESS: &str =
    "Ребята, у вас получилось! Но для начала вам нужно запустить систему.";
pub const FINALE_LAUNCH: &str = "Готовы? Спутник, мотор, поехали…";

pub const MALEVICH_DONE: &str = "Ура! Спешим дальше!";
pub const KAZAN_DONE: &str = "Отлично! Данные расшифрованы. Вместе с вами мы пройдём всё.";
pub const PROMOBOT_DONE: &str = "Расшифровал! Ещё одна часть ключа: 5";
pub const ORBION_DONE: &str = "Все верно! Я нашел еще одну часть ключа: 6";
pub const AR_ART_DONE: &str = "Ура! Теперь наша машина времени сможет взлететь!";
pub const AR_SUIT_DONE: &str =
    "Отлично! Жизненно необходимая профессия - Пожарный! Совершенно верно!";
pub const HOVERSURF_DONE: &str = "Отлично ребята! Так держать!";

pub const DATA_SAVED: &str = "Запись данных прошла успешно";
pub const OVISION_DONE: &str = "Ура-а-а! Теперь профессор сможет разблокировать всю систему в \
                                машине времени с помощью своего лица!";
pub const MOTORICA_GREAT: &str =
    "Как же это здорово! Эти роботы помогут нам быстро заменить сломанные детали!";
pub const MOTORICA_DONE: &str =
    "Как я вам благодарен, что вы мне помогли восстановить систему и свою машину.";

pub const QUIZ_ALREADY_ANSWERED: &str = "Вы уже ответили на этот вопрос.";
pub const QUIZ_NEXT_CODE: &str = "Жду следующий код";
pub const QUIZ_DONE: &str = "Друзья, вы большие молодцы! Не думал, что так быстро справитесь.";
