/// Parsed adjudication response: the eligibility probability from the first
/// non-empty line, plus every later non-empty line as a reason.
#[derive(Clone, Debug, PartialEq)]
pub struct AdjudicationReply {
	pub probability: f32,
	pub reasons: Vec<String>,
}

/// Parse an adjudicator reply. Returns `None` when the first non-empty line
/// is missing or not a bare number; the caller treats that as a silent
/// rejection, not an error.
pub fn parse_reply(text: &str) -> Option<AdjudicationReply> {
	let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
	let probability: f32 = lines.next()?.parse().ok()?;
	let reasons = lines.map(str::to_string).collect();

	Some(AdjudicationReply { probability, reasons })
}
