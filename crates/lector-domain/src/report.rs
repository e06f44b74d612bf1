//! The ten-section synthesized report

use crate::language::Language;
use serde::Serialize;

/// The ten canonical report sections, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    /// Concise summary of the whole work
    GeneralSummary,
    /// Central question or problem
    ResearchProblem,
    /// Methodology used
    Methodology,
    /// Most significant results
    MainResults,
    /// Main theoretical or conceptual arguments
    TheoreticalArgument,
    /// Academic contributions
    Contributions,
    /// Limitations mentioned or observed
    Limitations,
    /// Relations with other work in the area
    LiteratureConnections,
    /// Theoretical or practical consequences
    Implications,
    /// Strengths and weaknesses
    CriticalAnalysis,
}

impl ReportSection {
    /// All sections in report order
    pub const ALL: [ReportSection; 10] = [
        ReportSection::GeneralSummary,
        ReportSection::ResearchProblem,
        ReportSection::Methodology,
        ReportSection::MainResults,
        ReportSection::TheoreticalArgument,
        ReportSection::Contributions,
        ReportSection::Limitations,
        ReportSection::LiteratureConnections,
        ReportSection::Implications,
        ReportSection::CriticalAnalysis,
    ];

    /// JSON key requested from the oracle
    pub fn key(self) -> &'static str {
        match self {
            ReportSection::GeneralSummary => "general_summary",
            ReportSection::ResearchProblem => "research_problem",
            ReportSection::Methodology => "methodology",
            ReportSection::MainResults => "main_results",
            ReportSection::TheoreticalArgument => "theoretical_argument",
            ReportSection::Contributions => "contributions",
            ReportSection::Limitations => "limitations",
            ReportSection::LiteratureConnections => "literature_connections",
            ReportSection::Implications => "implications",
            ReportSection::CriticalAnalysis => "critical_analysis",
        }
    }

    /// Canonical heading title
    pub fn title(self, language: Language) -> &'static str {
        match language {
            Language::English => match self {
                ReportSection::GeneralSummary => "GENERAL SUMMARY",
                ReportSection::ResearchProblem => "RESEARCH PROBLEM",
                ReportSection::Methodology => "METHODOLOGY",
                ReportSection::MainResults => "MAIN RESULTS",
                ReportSection::TheoreticalArgument => "THEORETICAL ARGUMENT",
                ReportSection::Contributions => "CONTRIBUTIONS TO THE FIELD",
                ReportSection::Limitations => "LIMITATIONS",
                ReportSection::LiteratureConnections => "LITERATURE CONNECTIONS",
                ReportSection::Implications => "IMPLICATIONS",
                ReportSection::CriticalAnalysis => "CRITICAL ANALYSIS",
            },
            Language::Portuguese => match self {
                ReportSection::GeneralSummary => "RESUMO GERAL",
                ReportSection::ResearchProblem => "PROBLEMA DE PESQUISA",
                ReportSection::Methodology => "METODOLOGIA",
                ReportSection::MainResults => "RESULTADOS PRINCIPAIS",
                ReportSection::TheoreticalArgument => "ARGUMENTAÇÃO TEÓRICA",
                ReportSection::Contributions => "CONTRIBUIÇÕES PARA O CAMPO",
                ReportSection::Limitations => "LIMITAÇÕES",
                ReportSection::LiteratureConnections => "CONEXÕES COM A LITERATURA",
                ReportSection::Implications => "IMPLICAÇÕES",
                ReportSection::CriticalAnalysis => "ANÁLISE CRÍTICA",
            },
        }
    }

    /// What the oracle should write in this section
    pub fn description(self) -> &'static str {
        match self {
            ReportSection::GeneralSummary => "A concise summary of the complete work (250-300 words)",
            ReportSection::ResearchProblem => {
                "Clear articulation of the central question or problem addressed"
            }
            ReportSection::Methodology => "Detailed description of the methodology used",
            ReportSection::MainResults => "Exposition of the most significant results",
            ReportSection::TheoreticalArgument => {
                "Analysis of the main theoretical or conceptual arguments"
            }
            ReportSection::Contributions => "Explanation of the academic contributions",
            ReportSection::Limitations => "Limitations mentioned or observed",
            ReportSection::LiteratureConnections => "Relations with other work in the area",
            ReportSection::Implications => "Theoretical or practical consequences of the work",
            ReportSection::CriticalAnalysis => {
                "Critical evaluation of the work (strengths and weaknesses)"
            }
        }
    }

    /// Sentinel assigned when the section cannot be recovered from the oracle output
    pub fn not_found_text(self, language: Language) -> String {
        match language {
            Language::English => format!("Section {} not found", self.title(language)),
            Language::Portuguese => format!("Seção {} não encontrada", self.title(language)),
        }
    }
}

/// Which path produced a report's sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    /// Oracle response parsed as a JSON object
    Structured,
    /// Headings scanned out of unstructured oracle text
    Scanned,
    /// Built from a single segment analysis without a synthesis call
    Promoted,
}

/// Aggregated ten-section summary of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesizedReport {
    language: Language,
    source: ReportSource,
    general_summary: String,
    research_problem: String,
    methodology: String,
    main_results: String,
    theoretical_argument: String,
    contributions: String,
    limitations: String,
    literature_connections: String,
    implications: String,
    critical_analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_content: Option<String>,
}

impl SynthesizedReport {
    /// Build a report from a per-section lookup.
    ///
    /// Sections the lookup cannot supply, or supplies blank, receive the section's
    /// not-found sentinel, so every section is non-empty.
    pub fn from_lookup<F>(
        language: Language,
        source: ReportSource,
        raw_content: Option<String>,
        mut lookup: F,
    ) -> Self
    where
        F: FnMut(ReportSection) -> Option<String>,
    {
        let mut value = |section: ReportSection| {
            lookup(section)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| section.not_found_text(language))
        };

        Self {
            language,
            source,
            general_summary: value(ReportSection::GeneralSummary),
            research_problem: value(ReportSection::ResearchProblem),
            methodology: value(ReportSection::Methodology),
            main_results: value(ReportSection::MainResults),
            theoretical_argument: value(ReportSection::TheoreticalArgument),
            contributions: value(ReportSection::Contributions),
            limitations: value(ReportSection::Limitations),
            literature_connections: value(ReportSection::LiteratureConnections),
            implications: value(ReportSection::Implications),
            critical_analysis: value(ReportSection::CriticalAnalysis),
            raw_content,
        }
    }

    /// Text of one section
    pub fn section(&self, section: ReportSection) -> &str {
        match section {
            ReportSection::GeneralSummary => &self.general_summary,
            ReportSection::ResearchProblem => &self.research_problem,
            ReportSection::Methodology => &self.methodology,
            ReportSection::MainResults => &self.main_results,
            ReportSection::TheoreticalArgument => &self.theoretical_argument,
            ReportSection::Contributions => &self.contributions,
            ReportSection::Limitations => &self.limitations,
            ReportSection::LiteratureConnections => &self.literature_connections,
            ReportSection::Implications => &self.implications,
            ReportSection::CriticalAnalysis => &self.critical_analysis,
        }
    }

    /// Sections holding their not-found sentinel
    pub fn missing_sections(&self) -> Vec<ReportSection> {
        ReportSection::ALL
            .into_iter()
            .filter(|s| self.section(*s) == s.not_found_text(self.language))
            .collect()
    }

    /// Language of the section titles
    pub fn language(&self) -> Language {
        self.language
    }

    /// Path that produced the sections
    pub fn source(&self) -> ReportSource {
        self.source
    }

    /// Raw oracle text, retained when sections were scanned out of it
    pub fn raw_content(&self) -> Option<&str> {
        self.raw_content.as_deref()
    }
}
