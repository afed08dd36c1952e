use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// One scored row fetched from the graph store. The embedding payload stays
/// opaque until re-ranking; `graph_score` is the weighted attribute-match sum
/// computed server-side (0 when no target was bound).
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
	pub uri: String,
	pub label: String,
	pub embedding: Option<String>,
	pub graph_score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMovie {
	pub uri: String,
	pub label: String,
	pub graph_score: i64,
	/// Cosine similarity against the target embedding, when both vectors
	/// deserialized. Absent embeddings rank as similarity 0 but report `None`.
	pub embedding_similarity: Option<f32>,
	pub total_score: f32,
	pub is_target: bool,
}

#[derive(Debug, Clone)]
pub struct RankingOutcome {
	/// Sorted descending by `total_score`, ties broken by URI.
	pub items: Vec<RankedMovie>,
	/// False when the target row carried no usable embedding, in which case
	/// every candidate scored on `graph_score` alone.
	pub embedding_applied: bool,
	/// False when the target's own combined score was not positive and the
	/// self-relative rescale to [0, 10] was skipped.
	pub normalized: bool,
}

/// Deserializes an opaque embedding payload (JSON array of numbers). Any
/// malformed payload degrades to `None` for that candidate only.
pub fn parse_embedding(payload: &str) -> Option<Vec<f32>> {
	let values: Vec<serde_json::Value> = serde_json::from_str(payload).ok()?;
	let mut out = Vec::with_capacity(values.len());

	for value in values {
		out.push(value.as_f64()? as f32);
	}

	if out.is_empty() { None } else { Some(out) }
}

/// Cosine similarity in [-1, 1]. `None` on dimension mismatch, empty input,
/// or a zero-norm vector.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
	if a.is_empty() || a.len() != b.len() {
		return None;
	}

	let mut dot = 0.0_f32;
	let mut norm_a = 0.0_f32;
	let mut norm_b = 0.0_f32;

	for (x, y) in a.iter().zip(b) {
		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a <= 0.0 || norm_b <= 0.0 {
		return None;
	}

	Some((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Re-ranks graph-scored candidates against the target's embedding and
/// rescales every combined score relative to the target's own.
///
/// Returns `None` when the target URI is not among the candidates; the
/// caller decides whether that is a lookup fallback or an error.
pub fn rank_against_target(
	candidates: &[Candidate],
	target_uri: &str,
	embedding_scale: f32,
) -> Option<RankingOutcome> {
	let target = candidates.iter().find(|candidate| candidate.uri == target_uri)?;
	let target_vector = target.embedding.as_deref().and_then(parse_embedding);
	let target_graph_score = target.graph_score;
	let embedding_applied = target_vector.is_some();

	let mut scored = Vec::with_capacity(candidates.len());

	for candidate in candidates {
		let is_target = candidate.uri == target_uri;
		let similarity = if is_target {
			// The target's similarity with itself is 1 by definition; do not
			// let float rounding make the baseline less than the maximum.
			target_vector.as_ref().map(|_| 1.0)
		} else {
			match (&target_vector, candidate.embedding.as_deref().and_then(parse_embedding)) {
				(Some(target_vec), Some(vec)) => cosine_similarity(target_vec, &vec),
				_ => None,
			}
		};
		let combined = if embedding_applied {
			candidate.graph_score as f32 + (similarity.unwrap_or(0.0) + 1.0) * embedding_scale
		} else {
			candidate.graph_score as f32
		};

		scored.push((combined, RankedMovie {
			uri: candidate.uri.clone(),
			label: candidate.label.clone(),
			graph_score: candidate.graph_score,
			embedding_similarity: similarity,
			total_score: combined,
			is_target,
		}));
	}

	let target_combined = if embedding_applied {
		target_graph_score as f32 + 2.0 * embedding_scale
	} else {
		target_graph_score as f32
	};
	let normalized = target_combined > 0.0;

	let mut items: Vec<RankedMovie> = scored
		.into_iter()
		.map(|(combined, mut item)| {
			if normalized {
				item.total_score = combined / target_combined * 10.0;
			}

			item
		})
		.collect();

	sort_ranked(&mut items);

	Some(RankingOutcome { items, embedding_applied, normalized })
}

/// Description mode: no target entity, so there is no graph score to combine.
/// Candidates rank by cosine similarity against the query embedding alone,
/// mapped onto the same [0, 10] scale.
pub fn rank_by_embedding(candidates: &[Candidate], query_vector: &[f32]) -> Vec<RankedMovie> {
	let mut items: Vec<RankedMovie> = candidates
		.iter()
		.map(|candidate| {
			let similarity = candidate
				.embedding
				.as_deref()
				.and_then(parse_embedding)
				.and_then(|vec| cosine_similarity(query_vector, &vec));

			RankedMovie {
				uri: candidate.uri.clone(),
				label: candidate.label.clone(),
				graph_score: 0,
				embedding_similarity: similarity,
				total_score: (similarity.unwrap_or(0.0) + 1.0) / 2.0 * 10.0,
				is_target: false,
			}
		})
		.collect();

	sort_ranked(&mut items);

	items
}

/// Raw graph-score ordering with no embedding term and no normalization;
/// the fallback when the target row never made it into the candidate set.
pub fn rank_without_target(candidates: &[Candidate]) -> Vec<RankedMovie> {
	let mut items: Vec<RankedMovie> = candidates
		.iter()
		.map(|candidate| RankedMovie {
			uri: candidate.uri.clone(),
			label: candidate.label.clone(),
			graph_score: candidate.graph_score,
			embedding_similarity: None,
			total_score: candidate.graph_score as f32,
			is_target: false,
		})
		.collect();

	sort_ranked(&mut items);

	items
}

/// Truncates a sorted ranking to `limit` rows, force-including the target
/// when truncation would have dropped it. The output length is `limit`, or
/// `limit + 1` when the target had to be appended.
pub fn assemble(items: Vec<RankedMovie>, limit: usize) -> Vec<RankedMovie> {
	if items.len() <= limit {
		return items;
	}

	let target_kept = items.iter().take(limit).any(|item| item.is_target);
	let forced = if target_kept {
		None
	} else {
		items.iter().skip(limit).find(|item| item.is_target).cloned()
	};
	let mut out: Vec<RankedMovie> = items.into_iter().take(limit).collect();

	if let Some(target) = forced {
		out.push(target);
	}

	out
}

pub fn sort_ranked(items: &mut [RankedMovie]) {
	items.sort_by(|left, right| {
		cmp_f32_desc(left.total_score, right.total_score)
			.then_with(|| left.uri.cmp(&right.uri))
	});
}

pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}
