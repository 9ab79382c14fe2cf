//! Localized strings used when composing pages.

use serde::{Deserialize, Serialize};

/// Languages with a bundled string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// Parse a language code such as `en`, `fr` or `fr_ca`; unknown codes fall back to English.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        let primary = code.split(['_', '-']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "fr" => Self::Fr,
            _ => Self::En,
        }
    }

    #[must_use]
    pub fn strings(self) -> &'static Strings {
        match self {
            Self::En => &EN,
            Self::Fr => &FR,
        }
    }
}

/// String table for one locale.
#[derive(Debug)]
pub struct Strings {
    pub section0_name: &'static str,
    pub section_name: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    pub progress_title_course: &'static str,
    pub progress_title_section: &'static str,
    /// `{link}` is replaced by the completion settings URL.
    pub no_completion: &'static str,
    pub users_complete: &'static str,
    pub users_in_progress: &'static str,
    pub users_not_started: &'static str,
    pub main_course_page: &'static str,
    pub jump_to: &'static str,
    pub home: &'static str,
    pub home_tip: &'static str,
}

impl Strings {
    /// Default name of a numbered section, e.g. "Topic 3".
    #[must_use]
    pub fn default_section_name(&self, number: u32) -> String {
        if number == 0 {
            self.section0_name.to_owned()
        } else {
            format!("{} {number}", self.section_name)
        }
    }

    #[must_use]
    pub fn no_completion_message(&self, link: &str) -> String {
        self.no_completion.replace("{link}", link)
    }
}

static EN: Strings = Strings {
    section0_name: "Overview",
    section_name: "Topic",
    previous: "Previous:",
    next: "Next:",
    progress_title_course: "Course progress",
    progress_title_section: "Section progress",
    no_completion: "There is no <a href=\"{link}\">completion criteria</a> set for this course. \
                    It is highly recommended you set <a href=\"{link}\">completion criteria</a>.",
    users_complete: "Students complete",
    users_in_progress: "Students in progress",
    users_not_started: "Students not started",
    main_course_page: "Main course page",
    jump_to: "Jump to...",
    home: "Course home",
    home_tip: "Back to Course Home",
};

static FR: Strings = Strings {
    section0_name: "Aperçu",
    section_name: "Sujet",
    previous: "Précédent:",
    next: "Prochain:",
    progress_title_course: "Progression du cours",
    progress_title_section: "Avancement de la section",
    no_completion: "Aucun <a href=\"{link}\">critère d'achèvement</a> n'est défini pour ce cours. \
                    Il est fortement recommandé de définir des <a href=\"{link}\">critères d'achèvement</a>.",
    users_complete: "Les étudiants ont terminé",
    users_in_progress: "Etudiants en cours",
    users_not_started: "Les élèves n'ont pas commencé",
    main_course_page: "Page principale du cours",
    jump_to: "Aller à...",
    home: "Accueil du cours",
    home_tip: "Retour à l'accueil du cours",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_zero_uses_overview_name() {
        assert_eq!(Locale::En.strings().default_section_name(0), "Overview");
        assert_eq!(Locale::En.strings().default_section_name(4), "Topic 4");
        assert_eq!(Locale::Fr.strings().default_section_name(2), "Sujet 2");
    }

    #[test]
    fn locale_codes_fall_back_to_english() {
        assert_eq!(Locale::from_code("fr_ca"), Locale::Fr);
        assert_eq!(Locale::from_code("FR"), Locale::Fr);
        assert_eq!(Locale::from_code("de"), Locale::En);
        assert_eq!(Locale::from_code(""), Locale::En);
    }

    #[test]
    fn nag_message_embeds_link_twice() {
        let msg = Locale::En
            .strings()
            .no_completion_message("https://lms.test/course/completion.php?id=2");
        assert_eq!(msg.matches("completion.php?id=2").count(), 2);
    }
}
