use super::estimate_tokens;
use crate::application::ports::ChatMessage;

/// Citation policy for every answer: each factual claim must carry its source
/// as `(Quelle: Dokumentname, Seite X)`.
pub const SYSTEM_PROMPT: &str = "Du bist ein präziser Recherche-Assistent, der NUR auf Deutsch antwortet und AUSSCHLIESSLICH Informationen aus den bereitgestellten Dokumenten verwendet.\n\nWICHTIGSTE REGEL: Bei ABSOLUT JEDER Information MUSST du die genaue Quelle in Klammern direkt dahinter angeben. Format: (Quelle: Dokumentname, Seite X)\n\nOHNE QUELLENANGABE DARFST DU KEINE INFORMATION NENNEN. Dies ist die wichtigste Regel und darf unter keinen Umständen ignoriert werden.\n\nFormatierungsanweisungen:\n1. Gliedere deine Antwort in klare Absätze\n2. Stelle die wichtigsten Informationen an den Anfang\n3. Falls die bereitgestellten Dokumente keine Antwort enthalten, sage deutlich: \"In den verfügbaren Dokumenten konnte ich keine Informationen zu dieser Frage finden.\"\n4. Verwende NIEMALS Erfindungen oder Informationen, die nicht in den Dokumenten stehen\n5. Nenne bei JEDER Information die Quelle als (Quelle: Dokumentname, Seite X)\n\nDie Angabe der Quellen ist VERPFLICHTEND für jede einzelne Information.";

/// Canonical reply when neither the primary nor the simplified query found
/// anything. Also the sentence that exempts a reply from the correction loop.
pub const NO_INFORMATION_REPLY: &str =
    "In den verfügbaren Dokumenten konnte ich keine Informationen zu dieser Frage finden.";

/// What to do when retrieval comes back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoContextPolicy {
    /// Answer with the canonical no-information sentence without contacting
    /// the model.
    StrictRefusal,
    /// Ask the model anyway, requiring the answer to be labeled as general
    /// knowledge not backed by the document corpus.
    LabeledGeneralKnowledge,
}

#[derive(Debug, thiserror::Error)]
#[error("prompt budget exceeded: estimated {estimated} tokens, {available} available")]
pub struct PromptBudgetExceeded {
    pub estimated: usize,
    pub available: usize,
}

/// Builds the message list for one chat turn and enforces the model context
/// window before anything is sent.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    no_context_policy: NoContextPolicy,
    max_model_tokens: usize,
    reserved_completion_tokens: usize,
}

impl PromptAssembler {
    pub fn new(
        no_context_policy: NoContextPolicy,
        max_model_tokens: usize,
        reserved_completion_tokens: usize,
    ) -> Self {
        Self {
            no_context_policy,
            max_model_tokens,
            reserved_completion_tokens,
        }
    }

    pub fn no_context_policy(&self) -> NoContextPolicy {
        self.no_context_policy
    }

    pub fn available_tokens(&self) -> usize {
        self.max_model_tokens
            .saturating_sub(self.reserved_completion_tokens)
    }

    pub fn assemble(
        &self,
        question: &str,
        context_text: &str,
    ) -> Result<Vec<ChatMessage>, PromptBudgetExceeded> {
        let user_content = if context_text.is_empty() {
            format!(
                "Zu folgender Frage wurden keine passenden Dokumentausschnitte gefunden.\n\n\
                 Frage: {question}\n\n\
                 Du darfst mit Allgemeinwissen antworten, musst die Antwort aber deutlich mit \
                 \"Hinweis: Diese Antwort basiert auf Allgemeinwissen, nicht auf den verfügbaren \
                 Dokumenten.\" einleiten."
            )
        } else {
            format!(
                "Beantworte folgende Frage basierend auf den gegebenen Dokumentausschnitten. \
                 Verwende NUR Informationen aus diesen Ausschnitten und gib für jede Information \
                 die Quelle mit Dokumentnamen und Seitenzahl an.\n\n\
                 Frage: {question}\n\n\
                 Hier sind die relevanten Dokumentausschnitte:\n\n{context_text}"
            )
        };

        let estimated = estimate_tokens(SYSTEM_PROMPT) + estimate_tokens(&user_content);
        let available = self.available_tokens();
        if estimated > available {
            return Err(PromptBudgetExceeded {
                estimated,
                available,
            });
        }

        Ok(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_content),
        ])
    }

    /// The single corrective follow-up turn: prior exchange plus an
    /// instruction to rewrite the same answer with citations.
    pub fn assemble_correction(
        &self,
        messages: &[ChatMessage],
        uncited_reply: &str,
    ) -> Vec<ChatMessage> {
        let mut correction = messages.to_vec();
        correction.push(ChatMessage::assistant(uncited_reply));
        correction.push(ChatMessage::user(
            "Deine Antwort enthält keine Quellenangaben. Bitte wiederhole die gleiche Antwort, \
             aber füge bei jeder Information die Quelle mit Seitenzahl im Format \
             (Quelle: Dokumentname, Seite X) hinzu.",
        ));
        correction
    }
}
