use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

use crate::models::{GroundedAnswer, GroundingPayload, Heading, ServiceReply};
use crate::sections::SectionStore;

/// Projects the section store down to the matched headings. Headings absent
/// from the store contribute an empty line list instead of being omitted, so
/// the payload schema stays stable for the model.
pub fn build_payload(
    query: &str,
    matched: &HashSet<Heading>,
    sections: &SectionStore,
) -> GroundingPayload {
    let mut data = BTreeMap::new();
    for heading in Heading::ALL {
        if !matched.contains(&heading) {
            continue;
        }
        data.insert(
            heading.as_str().to_string(),
            sections.section_lines(heading).to_vec(),
        );
    }

    GroundingPayload {
        query: query.to_string(),
        data,
    }
}

/// The single text prompt sent to the generative service: a fixed grounding
/// instruction block around the serialized payload.
pub fn build_prompt(payload: &GroundingPayload) -> Result<String> {
    let payload_json =
        serde_json::to_string(payload).context("failed to serialize grounding payload")?;

    Ok(format!(
        r#"You are a travel itinerary assistant.

Input JSON:
{payload_json}

Instructions:
- Answer like an assistant in a human chat style, in lines rather than bullet points, explaining what in the data is relevant to the query.
- If the query is only a greeting like hi/hello, return:
  {{"explanation": "a short welcoming greeting asking how you can help", "heading": "na", "data_index": -1}}
- ONLY use the data in the 'data' field. No assumptions beyond it are allowed.
- Even if the query is a single word or an incomplete question, match it to the data as closely as possible.
- Return EXACTLY one JSON object with keys:
  "explanation": human-readable chat-style explanation
  "heading": the key from the input 'data' the answer came from
  "data_index": 0-based index of the line under that heading that best supports the answer
- If the answer cannot be found in the data, or the query is out of scope, return:
  {{"explanation": "{FALLBACK_MESSAGE}", "heading": "na", "data_index": -1}}
- Do NOT include any extra text outside the JSON.
"#
    ))
}

pub const FALLBACK_MESSAGE: &str = "I don't see this in your itinerary — contact support";

/// Fixed fallback used for malformed replies and service failures.
pub fn fallback_answer() -> GroundedAnswer {
    GroundedAnswer {
        explanation: FALLBACK_MESSAGE.to_string(),
        citation: None,
    }
}

#[derive(Deserialize)]
struct RawReply {
    explanation: String,
    heading: String,
    data_index: i64,
}

/// Parses the service's raw text against the payload used for this request.
/// The heading must be "na" or one of the payload's keys; anything else
/// (including unparseable JSON) is `Malformed`. Index bounds are checked
/// later, at citation resolution.
pub fn parse_reply(raw: &str, payload: &GroundingPayload) -> ServiceReply {
    let unwrapped = strip_wrappers(raw);

    let reply: RawReply = match serde_json::from_str(&unwrapped) {
        Ok(reply) => reply,
        Err(_) => return ServiceReply::Malformed,
    };

    if reply.heading == "na" || reply.data_index < 0 {
        return ServiceReply::Answer(GroundedAnswer {
            explanation: reply.explanation,
            citation: None,
        });
    }

    let Some(heading) = Heading::from_document_line(&reply.heading) else {
        return ServiceReply::Malformed;
    };
    if !payload.data.contains_key(heading.as_str()) {
        return ServiceReply::Malformed;
    }

    ServiceReply::Answer(GroundedAnswer {
        explanation: reply.explanation,
        citation: Some((heading, reply.data_index as usize)),
    })
}

/// Strips the code-fence wrappers models like to add around JSON output:
/// triple-backtick fences (plain or language-tagged) and the triple-quote
/// '''json variant. Unrecognized shapes pass through trimmed.
fn strip_wrappers(raw: &str) -> String {
    let text = raw.trim();

    if text.starts_with("```") && text.ends_with("```") && text.len() > 6 {
        let re = Regex::new(r"(?s)^```[a-zA-Z]*\s*\n?(.*?)\n?```$")
            .unwrap_or_else(|_| Regex::new("^$").unwrap());
        if let Some(caps) = re.captures(text) {
            if let Some(body) = caps.get(1) {
                return body.as_str().trim().to_string();
            }
        }
    }

    if let Some(body) = text
        .strip_prefix("'''json")
        .and_then(|t| t.strip_suffix("'''"))
    {
        return body.trim().to_string();
    }
    if let Some(body) = text.strip_prefix("'''").and_then(|t| t.strip_suffix("'''")) {
        return body.trim().to_string();
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagIndex;

    fn store() -> SectionStore {
        SectionStore::from_text(
            "Flights\nAI-203 dep 09:40\nSeat 14C\nHotel\nBayview Resort Goa\nDeluxe room, 2 nights\n",
        )
    }

    fn payload_for(headings: &[Heading]) -> GroundingPayload {
        let matched: HashSet<Heading> = headings.iter().copied().collect();
        build_payload("test query", &matched, &store())
    }

    #[test]
    fn payload_contains_only_matched_headings() {
        let payload = payload_for(&[Heading::Flights]);
        assert!(payload.data.contains_key(Heading::Flights.as_str()));
        assert!(!payload.data.contains_key(Heading::Hotel.as_str()));
        assert_eq!(payload.data.len(), 1);
    }

    #[test]
    fn payload_isolation_holds_for_matcher_output() {
        let index = TagIndex::new();
        let matched = crate::matcher::match_headings("when does my flight land", &index);
        let payload = build_payload("when does my flight land", &matched, &store());
        for key in payload.data.keys() {
            let heading = Heading::from_document_line(key).expect("non-canonical payload key");
            assert!(matched.contains(&heading));
        }
    }

    #[test]
    fn missing_heading_contributes_empty_lines() {
        let payload = payload_for(&[Heading::BaggagePolicy]);
        assert_eq!(
            payload.data.get(Heading::BaggagePolicy.as_str()),
            Some(&Vec::new())
        );
    }

    #[test]
    fn prompt_embeds_the_payload_json() {
        let payload = payload_for(&[Heading::Flights]);
        let prompt = build_prompt(&payload).expect("prompt");
        assert!(prompt.contains("AI-203 dep 09:40"));
        assert!(prompt.contains(FALLBACK_MESSAGE));
        assert!(!prompt.contains("Bayview Resort Goa"));
    }

    #[test]
    fn strips_json_tagged_fence() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_wrappers(raw), "{\"a\": 1}");
    }

    #[test]
    fn strips_plain_fence_and_triple_quote() {
        assert_eq!(strip_wrappers("```\n{}\n```"), "{}");
        assert_eq!(strip_wrappers("'''json{\"a\": 1}'''"), "{\"a\": 1}");
    }

    #[test]
    fn unwrapped_text_passes_through() {
        assert_eq!(strip_wrappers("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn well_formed_reply_parses_with_citation() {
        let payload = payload_for(&[Heading::Flights]);
        let raw = r#"{"explanation": "You land after the 09:40 departure.", "heading": "Flights", "data_index": 0}"#;
        let reply = parse_reply(raw, &payload);
        assert_eq!(
            reply,
            ServiceReply::Answer(GroundedAnswer {
                explanation: "You land after the 09:40 departure.".to_string(),
                citation: Some((Heading::Flights, 0)),
            })
        );
    }

    #[test]
    fn na_heading_carries_no_citation() {
        let payload = payload_for(&[Heading::Flights]);
        let raw = r#"{"explanation": "Hi! How can I help?", "heading": "na", "data_index": -1}"#;
        match parse_reply(raw, &payload) {
            ServiceReply::Answer(answer) => assert!(answer.citation.is_none()),
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn heading_outside_payload_is_malformed() {
        let payload = payload_for(&[Heading::Flights]);
        let raw = r#"{"explanation": "x", "heading": "Hotel", "data_index": 0}"#;
        assert_eq!(parse_reply(raw, &payload), ServiceReply::Malformed);
    }

    #[test]
    fn truncated_json_is_malformed() {
        let payload = payload_for(&[Heading::Flights]);
        assert_eq!(
            parse_reply(r#"{"explanation": "x", "hea"#, &payload),
            ServiceReply::Malformed
        );
        assert_eq!(parse_reply("not json at all", &payload), ServiceReply::Malformed);
    }

    #[test]
    fn fenced_reply_still_parses() {
        let payload = payload_for(&[Heading::Flights]);
        let raw = "```json\n{\"explanation\": \"e\", \"heading\": \"Flights\", \"data_index\": 1}\n```";
        match parse_reply(raw, &payload) {
            ServiceReply::Answer(answer) => {
                assert_eq!(answer.citation, Some((Heading::Flights, 1)));
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }
}
