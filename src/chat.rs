use std::sync::Arc;

use anyhow::Result;

use crate::config::AppConfig;
use crate::gemini::GeminiClient;
use crate::grounding::{self, FALLBACK_MESSAGE};
use crate::matcher;
use crate::models::{AskRequest, AskResponse, ServiceReply};
use crate::sections::SectionStore;
use crate::sessions::SessionStore;
use crate::tags::TagIndex;

const EMPTY_QUERY_MESSAGE: &str = "Please enter a query.";
const QUOTA_MESSAGE: &str =
    "You have reached 10 questions. Please wait a while before asking again.";

/// Orchestrates one question end to end: throttle check, lexical matching,
/// payload projection, the generative call, and citation resolution.
#[derive(Clone)]
pub struct ChatService {
    config: AppConfig,
    sections: Arc<SectionStore>,
    tags: Arc<TagIndex>,
    gemini: GeminiClient,
    sessions: SessionStore,
}

impl ChatService {
    pub fn new(
        config: AppConfig,
        sections: Arc<SectionStore>,
        tags: Arc<TagIndex>,
        gemini: GeminiClient,
        sessions: SessionStore,
    ) -> Self {
        Self {
            config,
            sections,
            tags,
            gemini,
            sessions,
        }
    }

    pub async fn answer(&self, request: AskRequest) -> Result<AskResponse> {
        self.sessions.ensure(&request.session_id)?;

        // Exhausted sessions never reach the matcher or the model, and the
        // counter stays where it is.
        if self.sessions.remaining(&request.session_id)? == 0 {
            return Ok(no_citation_response(QUOTA_MESSAGE));
        }

        let query = request.query.trim();
        if query.is_empty() {
            // User-input error; prompt again without consuming quota.
            return Ok(no_citation_response(EMPTY_QUERY_MESSAGE));
        }

        let matched = matcher::match_headings(query, &self.tags);
        if matched.is_empty() {
            self.sessions.consume(&request.session_id)?;
            return Ok(no_citation_response(FALLBACK_MESSAGE));
        }

        let payload = grounding::build_payload(query, &matched, &self.sections);
        let reply = match grounding::build_prompt(&payload) {
            Ok(prompt) => match self
                .gemini
                .generate_text(&self.config.answer_model, &prompt)
                .await
            {
                Ok(text) => grounding::parse_reply(&text, &payload),
                Err(err) => ServiceReply::Failed(err.to_string()),
            },
            Err(err) => ServiceReply::Failed(err.to_string()),
        };

        self.sessions.consume(&request.session_id)?;

        let answer = match reply {
            ServiceReply::Answer(answer) => answer,
            ServiceReply::Malformed => {
                tracing::warn!("model reply failed schema validation, using fallback");
                grounding::fallback_answer()
            }
            ServiceReply::Failed(detail) => {
                tracing::error!("generative call failed: {detail}");
                grounding::fallback_answer()
            }
        };

        Ok(resolve_citation(answer, &self.sections))
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

/// Resolves a validated answer's citation against the original store. An
/// out-of-range index drops the citation but keeps the explanation text.
fn resolve_citation(
    answer: crate::models::GroundedAnswer,
    sections: &SectionStore,
) -> AskResponse {
    let (heading, data_line) = match answer.citation {
        Some((heading, index)) => match sections.section_lines(heading).get(index) {
            Some(line) => (heading.as_str().to_string(), line.clone()),
            None => {
                tracing::warn!(
                    heading = heading.as_str(),
                    index,
                    "cited index out of range, dropping citation"
                );
                ("na".to_string(), String::new())
            }
        },
        None => ("na".to_string(), String::new()),
    };

    AskResponse {
        response: answer.explanation,
        heading,
        data_line,
    }
}

fn no_citation_response(message: &str) -> AskResponse {
    AskResponse {
        response: message.to_string(),
        heading: "na".to_string(),
        data_line: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroundedAnswer, Heading};
    use crate::sessions::MAX_QUESTIONS;

    fn service() -> ChatService {
        let config = AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            document_path: "/dev/null".into(),
            gemini_base_url: "http://127.0.0.1:9".to_string(),
            gemini_api_key: String::new(),
            answer_model: "gemini-2.0-flash".to_string(),
        };
        let sections = Arc::new(SectionStore::from_text(
            "Flights\nAI-203 dep 09:40\nHotel Policies (Bayview Resort Goa)\nNo pets\nQuiet hours 22:00\nLate checkout on request\nCheck-in from 2 PM\n",
        ));
        ChatService::new(
            config,
            sections,
            Arc::new(TagIndex::new()),
            GeminiClient::new("http://127.0.0.1:9", ""),
            SessionStore::new(),
        )
    }

    fn ask(session_id: &str, query: &str) -> AskRequest {
        AskRequest {
            session_id: session_id.to_string(),
            query: query.to_string(),
        }
    }

    #[tokio::test]
    async fn empty_query_prompts_without_consuming_quota() {
        let chat = service();
        let id = chat.sessions().create().expect("create");

        let response = chat.answer(ask(&id, "   ")).await.expect("answer");
        assert_eq!(response.response, EMPTY_QUERY_MESSAGE);
        assert_eq!(response.heading, "na");
        assert_eq!(chat.sessions().remaining(&id).expect("remaining"), MAX_QUESTIONS);
    }

    #[tokio::test]
    async fn unmatched_query_returns_fallback_and_consumes_quota() {
        let chat = service();
        let id = chat.sessions().create().expect("create");

        let response = chat
            .answer(ask(&id, "quantum chromodynamics"))
            .await
            .expect("answer");
        assert_eq!(response.response, FALLBACK_MESSAGE);
        assert_eq!(response.heading, "na");
        assert_eq!(response.data_line, "");
        assert_eq!(
            chat.sessions().remaining(&id).expect("remaining"),
            MAX_QUESTIONS - 1
        );
    }

    #[tokio::test]
    async fn eleventh_question_is_throttled_without_consuming() {
        let chat = service();
        let id = chat.sessions().create().expect("create");
        for _ in 0..MAX_QUESTIONS {
            chat.sessions().consume(&id).expect("consume");
        }

        // Repeated exhausted requests keep returning the same message and
        // never touch the counter, the matcher, or the model.
        for _ in 0..3 {
            let response = chat
                .answer(ask(&id, "what time is check-in?"))
                .await
                .expect("answer");
            assert_eq!(response.response, QUOTA_MESSAGE);
            assert_eq!(response.heading, "na");
            assert_eq!(chat.sessions().remaining(&id).expect("remaining"), 0);
        }
    }

    #[tokio::test]
    async fn service_failure_degrades_to_fallback() {
        // The configured Gemini endpoint is unreachable, so a matched query
        // exercises the Failed(..) path end to end.
        let chat = service();
        let id = chat.sessions().create().expect("create");

        let response = chat
            .answer(ask(&id, "what are the hotel policies?"))
            .await
            .expect("answer");
        assert_eq!(response.response, FALLBACK_MESSAGE);
        assert_eq!(response.heading, "na");
        assert_eq!(response.data_line, "");
        assert_eq!(
            chat.sessions().remaining(&id).expect("remaining"),
            MAX_QUESTIONS - 1
        );
    }

    #[test]
    fn valid_citation_resolves_to_the_exact_source_line() {
        let chat = service();
        let answer = GroundedAnswer {
            explanation: "Check-in is at 2 PM.".to_string(),
            citation: Some((Heading::HotelPolicies, 3)),
        };
        let response = resolve_citation(answer, &chat.sections);
        assert_eq!(response.response, "Check-in is at 2 PM.");
        assert_eq!(response.heading, Heading::HotelPolicies.as_str());
        assert_eq!(response.data_line, "Check-in from 2 PM");
    }

    #[test]
    fn out_of_range_citation_degrades_but_keeps_the_explanation() {
        let chat = service();
        let answer = GroundedAnswer {
            explanation: "Your flight leaves at 09:40.".to_string(),
            citation: Some((Heading::Flights, 99)),
        };
        let response = resolve_citation(answer, &chat.sections);
        assert_eq!(response.response, "Your flight leaves at 09:40.");
        assert_eq!(response.heading, "na");
        assert_eq!(response.data_line, "");
    }
}
