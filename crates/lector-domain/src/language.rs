//! Report language

use serde::{Deserialize, Serialize};

/// Language of the canonical section titles and of the oracle-authored text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English titles (`GENERAL SUMMARY`, `RESEARCH PROBLEM`, ...)
    #[default]
    English,
    /// Portuguese titles (`RESUMO GERAL`, `PROBLEMA DE PESQUISA`, ...)
    Portuguese,
}

impl Language {
    /// Both supported languages
    pub const ALL: [Language; 2] = [Language::English, Language::Portuguese];

    /// Language name as written in prompts
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Portuguese => "Portuguese",
        }
    }
}
