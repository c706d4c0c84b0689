use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Tipo de entrada que un workflow acepta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputType {
    Audio,
    Text,
    Image,
}

/// Conjunto cerrado de workflows que el agente sabe ejecutar.
///
/// Todo identificador fuera de este conjunto se rechaza antes de gastar
/// recursos (fallar cerrado); nunca hay rama "genérica".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowKind {
    AiAgentChat,
    RagChatbot,
    WebSearchBot,
    AutoCrawler,
    SheetChat,
    WebScraper,
    MeetingAssistant,
    InspirationGenerator,
}

impl WorkflowKind {
    /// Identificador estable usado en la API y el catálogo.
    pub fn id(&self) -> &'static str {
        match self {
            WorkflowKind::AiAgentChat => "ai-agent-chat",
            WorkflowKind::RagChatbot => "rag-chatbot",
            WorkflowKind::WebSearchBot => "web-search-bot",
            WorkflowKind::AutoCrawler => "auto-crawler",
            WorkflowKind::SheetChat => "sheet-chat",
            WorkflowKind::WebScraper => "web-scraper",
            WorkflowKind::MeetingAssistant => "meeting-assistant",
            WorkflowKind::InspirationGenerator => "inspiration-generator",
        }
    }

    pub fn parse(id: &str) -> Result<Self, DomainError> {
        Self::all().iter()
            .find(|k| k.id() == id)
            .copied()
            .ok_or_else(|| DomainError::UnknownWorkflow(id.to_string()))
    }

    pub fn all() -> &'static [WorkflowKind] {
        &[WorkflowKind::AiAgentChat,
          WorkflowKind::RagChatbot,
          WorkflowKind::WebSearchBot,
          WorkflowKind::AutoCrawler,
          WorkflowKind::SheetChat,
          WorkflowKind::WebScraper,
          WorkflowKind::MeetingAssistant,
          WorkflowKind::InspirationGenerator]
    }

    pub fn input_type(&self) -> InputType {
        match self {
            WorkflowKind::MeetingAssistant => InputType::Audio,
            WorkflowKind::InspirationGenerator => InputType::Image,
            _ => InputType::Text,
        }
    }
}

impl FromStr for WorkflowKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkflowKind::parse(s)
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
