//! Lucky-number and draw-narrative collaborator
//!
//! Thin client for an external text-generation API. Every entry point
//! degrades to a deterministic local fallback — a failing or
//! unconfigured collaborator must never block a purchase or a draw.

use anyhow::{anyhow, Context};
use rand::seq::SliceRandom;
use serde::Deserialize;

/// Response shape of the text-generation API
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: String,
}

/// Client for the lucky-number / narrative API
#[derive(Clone)]
pub struct LuckyClient {
    http: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
}

impl LuckyClient {
    pub fn new(api_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }

    /// Suggest `count` numbers from the available set. Falls back to a
    /// uniform random sample on any failure.
    pub async fn suggest_numbers(
        &self,
        lottery_title: &str,
        available: &[i32],
        count: usize,
    ) -> Vec<i32> {
        match self.request_numbers(lottery_title, available, count).await {
            Ok(numbers) => numbers,
            Err(e) => {
                tracing::warn!(error = %e, "Lucky-number API unavailable, using random pick");
                fallback_pick(available, count)
            }
        }
    }

    async fn request_numbers(
        &self,
        lottery_title: &str,
        available: &[i32],
        count: usize,
    ) -> anyhow::Result<Vec<i32>> {
        // The prompt only ever sees a bounded slice of the pool.
        let sample: Vec<i32> = available.iter().copied().take(200).collect();
        let prompt = format!(
            "Estoy jugando a una lotería llamada \"{}\". Genera {} números de la \
             suerte únicos de la siguiente lista: {:?}. Devuelve los números como \
             un array JSON de enteros.",
            lottery_title, count, sample
        );

        let text = self.request_text(&prompt).await?;
        let numbers: Vec<i32> =
            serde_json::from_str(text.trim()).context("Response was not a JSON integer array")?;

        // Keep only suggestions that are genuinely available, deduped.
        let mut picked = Vec::new();
        for n in numbers {
            if available.contains(&n) && !picked.contains(&n) {
                picked.push(n);
            }
        }
        picked.truncate(count);

        if picked.is_empty() {
            return Err(anyhow!("No usable numbers in response"));
        }
        Ok(picked)
    }

    /// Generate a short celebratory narrative for a completed draw.
    /// Falls back to a templated string on any failure.
    pub async fn draw_narrative(
        &self,
        lottery_title: &str,
        prize: &str,
        winning_number: i32,
    ) -> String {
        let prompt = format!(
            "Escribe una breve y emocionante historia (máximo 150 palabras) sobre \
             cómo el número {} resultó ganador del sorteo \"{}\" con un premio de {}. \
             Usa un tono festivo y misterioso.",
            winning_number, lottery_title, prize
        );

        match self.request_text(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => fallback_narrative(winning_number, prize),
            Err(e) => {
                tracing::warn!(error = %e, "Narrative API unavailable, using template");
                fallback_narrative(winning_number, prize)
            }
        }
    }

    async fn request_text(&self, prompt: &str) -> anyhow::Result<String> {
        let api_url = self
            .api_url
            .as_deref()
            .ok_or_else(|| anyhow!("LUCKY_API_URL not configured"))?;

        let mut request = self
            .http
            .post(api_url)
            .json(&serde_json::json!({ "prompt": prompt }));

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .context("Request to text-generation API failed")?
            .error_for_status()
            .context("Text-generation API returned an error status")?;

        let body: GenerateResponse = response
            .json()
            .await
            .context("Malformed text-generation API response")?;

        Ok(body.text)
    }
}

/// Uniform random sample of the available numbers, without replacement
pub fn fallback_pick(available: &[i32], count: usize) -> Vec<i32> {
    let mut rng = rand::thread_rng();
    available
        .choose_multiple(&mut rng, count.min(available.len()))
        .copied()
        .collect()
}

/// Templated narrative used when the collaborator is unreachable
pub fn fallback_narrative(winning_number: i32, prize: &str) -> String {
    format!(
        "¡La suerte ha hablado! El número {} se lleva el gran premio de {}.",
        winning_number, prize
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_pick_is_subset_without_duplicates() {
        let available = vec![1, 4, 7, 9, 12, 15];
        let picked = fallback_pick(&available, 4);

        assert_eq!(picked.len(), 4);
        for n in &picked {
            assert!(available.contains(n));
        }
        let mut deduped = picked.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), picked.len());
    }

    #[test]
    fn test_fallback_pick_caps_at_pool_size() {
        let available = vec![3, 5];
        assert_eq!(fallback_pick(&available, 10).len(), 2);
        assert!(fallback_pick(&[], 5).is_empty());
    }

    #[test]
    fn test_fallback_narrative_mentions_winner_and_prize() {
        let text = fallback_narrative(42, "$50,000");
        assert!(text.contains("42"));
        assert!(text.contains("$50,000"));
    }
}
