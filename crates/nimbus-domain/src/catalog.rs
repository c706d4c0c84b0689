//! Catálogo estático de workflows publicados en el marketplace.
//!
//! Los precios están en la unidad nativa de la red (SUI) y sólo se muestran;
//! el cobro real vive en el contrato, no acá.

use once_cell::sync::Lazy;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::workflow::{InputType, WorkflowKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowListing {
    pub kind: WorkflowKind,
    pub title: &'static str,
    pub description: &'static str,
    pub price: f64,
    pub author: &'static str,
}

impl WorkflowListing {
    pub fn input_type(&self) -> InputType {
        self.kind.input_type()
    }
}

pub static CATALOG: Lazy<Vec<WorkflowListing>> = Lazy::new(|| {
    vec![WorkflowListing { kind: WorkflowKind::AiAgentChat,
                           title: "AI agent chat",
                           description: "A powerful chat interface connected to your custom knowledge base.",
                           price: 1.0,
                           author: "n8n Team" },
         WorkflowListing { kind: WorkflowKind::RagChatbot,
                           title: "RAG Chatbot for Company Documents",
                           description: "Use Google Drive and Gemini to answer questions about your internal docs.",
                           price: 2.0,
                           author: "Mihai Farcas" },
         WorkflowListing { kind: WorkflowKind::WebSearchBot,
                           title: "AI chatbot that can search the web",
                           description: "An agent that browses the internet to find real-time information for you.",
                           price: 1.5,
                           author: "n8n Team" },
         WorkflowListing { kind: WorkflowKind::AutoCrawler,
                           title: "Autonomous AI crawler",
                           description: "Scrape websites automatically and extract structured data into spreadsheets.",
                           price: 3.0,
                           author: "Oskar" },
         WorkflowListing { kind: WorkflowKind::SheetChat,
                           title: "Chat with a Google Sheet using AI",
                           description: "Interact with your spreadsheet data using natural language.",
                           price: 1.0,
                           author: "David Roberts" },
         WorkflowListing { kind: WorkflowKind::WebScraper,
                           title: "AI agent that can scrape webpages",
                           description: "Extract content from any URL and summarize it using LLMs.",
                           price: 1.2,
                           author: "Eduard" },
         WorkflowListing { kind: WorkflowKind::MeetingAssistant,
                           title: "Meeting assistant",
                           description: "Transcribe a meeting recording and produce an actionable summary.",
                           price: 2.5,
                           author: "Nimbus Team" },
         WorkflowListing { kind: WorkflowKind::InspirationGenerator,
                           title: "Inspiration generator",
                           description: "Turn a reference image or prompt into new generated artwork.",
                           price: 2.0,
                           author: "Nimbus Team" }]
});

/// Entrada del catálogo para un workflow, si está publicado.
pub fn listing(kind: WorkflowKind) -> Option<&'static WorkflowListing> {
    CATALOG.iter().find(|l| l.kind == kind)
}

/// Huella estable del catálogo completo: cambia si y sólo si cambia alguna
/// entrada publicada.
pub fn catalog_fingerprint() -> String {
    let mut hasher = Sha256::new();
    for entry in CATALOG.iter() {
        hasher.update(entry.kind.id().as_bytes());
        hasher.update(entry.title.as_bytes());
        hasher.update(entry.description.as_bytes());
        hasher.update(entry.price.to_bits().to_be_bytes());
        hasher.update(entry.author.as_bytes());
    }
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
