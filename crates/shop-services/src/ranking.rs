//! Cosine ranking of candidate embeddings against a query embedding.

use crate::{CandidateScore, MatchCandidate, MatchReport};

/// Cosine similarity `dot(a, b) / (|a| * |b|)`, 0 when either norm is 0.
/// Only the overlapping prefix of mismatched vectors is compared.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Score each candidate against `query`. `vectors[i]` belongs to `candidates[i]`;
/// candidates without a vector are left unscored.
pub fn rank_candidates(
    query: &[f32],
    candidates: &[MatchCandidate],
    vectors: &[Vec<f32>],
) -> MatchReport {
    let scores: Vec<CandidateScore> = candidates
        .iter()
        .zip(vectors.iter())
        .map(|(candidate, vector)| CandidateScore {
            id: candidate.id.clone(),
            score: cosine_similarity(query, vector),
        })
        .collect();
    let best_id = best_scored(&scores)
        .map(|s| s.id.clone())
        .or_else(|| candidates.first().map(|c| c.id.clone()));
    MatchReport { best_id, scores }
}

/// Highest score; ties keep the earliest entry.
pub fn best_scored(scores: &[CandidateScore]) -> Option<&CandidateScore> {
    let mut best: Option<&CandidateScore> = None;
    let mut best_score = f32::NEG_INFINITY;
    for entry in scores {
        if entry.score > best_score {
            best_score = entry.score;
            best = Some(entry);
        }
    }
    best
}

impl MatchReport {
    /// `bestId` when the service sent one, otherwise the top of `scores`.
    pub fn best(&self) -> Option<String> {
        match &self.best_id {
            Some(id) if !id.is_empty() => Some(id.clone()),
            _ => best_scored(&self.scores).map(|s| s.id.clone()),
        }
    }
}
