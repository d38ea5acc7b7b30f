use crate::i18n::Locale;

/// All localized user-facing strings for a locale.
#[derive(Debug, Clone)]
pub struct LocaleStrings {
    // ==================== Page Metadata ====================
    /// Document title used by every page
    pub meta_title: &'static str,

    /// Meta description used by every page
    pub meta_description: &'static str,

    /// Meta keywords used by every page
    pub meta_keywords: &'static str,

    // ==================== Content States ====================
    /// Shown when the CMS had no entry for the request
    pub content_not_found: &'static str,

    /// Shown when the CMS could not be reached
    pub content_unavailable: &'static str,

    // ==================== Search ====================
    /// Heading of the search page
    /// Placeholders: {query}
    pub search_heading: &'static str,

    /// Shown when the search produced no results
    pub search_no_results: &'static str,

    // ==================== Contact Form Validation ====================
    pub name_min: &'static str,
    pub name_max: &'static str,
    pub name_regex: &'static str,
    pub email_invalid: &'static str,
    pub email_max: &'static str,
    pub message_min: &'static str,
    pub message_max: &'static str,

    // ==================== Contact Form Responses ====================
    pub contact_success: &'static str,
    pub contact_failed: &'static str,
    pub verification_failed: &'static str,
    pub contact_timeout: &'static str,
    pub contact_rate_limited: &'static str,
    pub contact_invalid_request: &'static str,
    pub contact_service_unavailable: &'static str,
}

impl LocaleStrings {
    /// Strings for a validated locale.
    pub fn for_locale(locale: Locale) -> &'static LocaleStrings {
        Self::for_code(locale.code())
    }

    /// Strings for a raw code, falling back to the default locale's table.
    pub fn for_code(code: &str) -> &'static LocaleStrings {
        match code {
            "en" => &ENGLISH_STRINGS,
            "ru" => &RUSSIAN_STRINGS,
            _ => &GERMAN_STRINGS,
        }
    }
}

// ==================== German Strings ====================

/// German strings (default locale)
pub const GERMAN_STRINGS: LocaleStrings = LocaleStrings {
    meta_title: "Reiseblog",
    meta_description: "Reiseberichte, Karten und Geschichten aus aller Welt.",
    meta_keywords: "Reisen, Reiseblog, Reiseberichte, Weltkarte",

    content_not_found: "Der angeforderte Inhalt wurde nicht gefunden.",
    content_unavailable: "Die Inhalte konnten gerade nicht geladen werden. Bitte später erneut versuchen.",

    search_heading: "Suche nach: {query}",
    search_no_results: "Keine passenden Reiseberichte gefunden.",

    name_min: "Der Name muss mindestens 2 Zeichen lang sein.",
    name_max: "Der Name darf höchstens 50 Zeichen lang sein.",
    name_regex: "Der Name darf nur Buchstaben, Leerzeichen und Bindestriche enthalten.",
    email_invalid: "Bitte eine gültige E-Mail-Adresse angeben.",
    email_max: "Die E-Mail-Adresse darf höchstens 100 Zeichen lang sein.",
    message_min: "Die Nachricht muss mindestens 10 Zeichen lang sein.",
    message_max: "Die Nachricht darf höchstens 1000 Zeichen lang sein.",

    contact_success: "Vielen Dank! Die Nachricht wurde erfolgreich gesendet.",
    contact_failed: "Die Nachricht konnte nicht gesendet werden. Bitte später erneut versuchen.",
    verification_failed: "Die Sicherheitsüberprüfung ist fehlgeschlagen. Bitte erneut versuchen.",
    contact_timeout: "Der E-Mail-Dienst antwortet nicht. Bitte später erneut versuchen.",
    contact_rate_limited: "Zu viele Anfragen. Bitte kurz warten und erneut versuchen.",
    contact_invalid_request: "Die Anfrage war ungültig. Bitte die Eingaben prüfen.",
    contact_service_unavailable: "Der E-Mail-Dienst ist derzeit nicht erreichbar.",
};

// ==================== English Strings ====================

/// English strings
pub const ENGLISH_STRINGS: LocaleStrings = LocaleStrings {
    meta_title: "Travel Blog",
    meta_description: "Travel stories, maps and tales from around the world.",
    meta_keywords: "travel, travel blog, travel stories, world map",

    content_not_found: "The requested content could not be found.",
    content_unavailable: "Content could not be loaded right now. Please try again later.",

    search_heading: "Search for: {query}",
    search_no_results: "No matching travel stories found.",

    name_min: "Name must be at least 2 characters long.",
    name_max: "Name must be at most 50 characters long.",
    name_regex: "Name may only contain letters, spaces and hyphens.",
    email_invalid: "Please enter a valid email address.",
    email_max: "Email address must be at most 100 characters long.",
    message_min: "Message must be at least 10 characters long.",
    message_max: "Message must be at most 1000 characters long.",

    contact_success: "Thank you! Your message has been sent.",
    contact_failed: "Your message could not be sent. Please try again later.",
    verification_failed: "Security verification failed. Please try again.",
    contact_timeout: "The email service did not respond in time. Please try again later.",
    contact_rate_limited: "Too many requests. Please wait a moment and try again.",
    contact_invalid_request: "The request was invalid. Please check your input.",
    contact_service_unavailable: "The email service is currently unavailable.",
};

// ==================== Russian Strings ====================

/// Russian strings
pub const RUSSIAN_STRINGS: LocaleStrings = LocaleStrings {
    meta_title: "Блог о путешествиях",
    meta_description: "Истории, карты и впечатления из путешествий по всему миру.",
    meta_keywords: "путешествия, блог, истории путешествий, карта мира",

    content_not_found: "Запрошенный материал не найден.",
    content_unavailable: "Не удалось загрузить материалы. Пожалуйста, попробуйте позже.",

    search_heading: "Поиск: {query}",
    search_no_results: "Подходящих историй не найдено.",

    name_min: "Имя должно содержать не менее 2 символов.",
    name_max: "Имя должно содержать не более 50 символов.",
    name_regex: "Имя может содержать только буквы, пробелы и дефисы.",
    email_invalid: "Пожалуйста, введите корректный адрес электронной почты.",
    email_max: "Адрес электронной почты должен содержать не более 100 символов.",
    message_min: "Сообщение должно содержать не менее 10 символов.",
    message_max: "Сообщение должно содержать не более 1000 символов.",

    contact_success: "Спасибо! Ваше сообщение отправлено.",
    contact_failed: "Не удалось отправить сообщение. Пожалуйста, попробуйте позже.",
    verification_failed: "Проверка безопасности не пройдена. Пожалуйста, попробуйте ещё раз.",
    contact_timeout: "Почтовый сервис не ответил вовремя. Пожалуйста, попробуйте позже.",
    contact_rate_limited: "Слишком много запросов. Пожалуйста, подождите и попробуйте снова.",
    contact_invalid_request: "Некорректный запрос. Пожалуйста, проверьте введённые данные.",
    contact_service_unavailable: "Почтовый сервис сейчас недоступен.",
};
