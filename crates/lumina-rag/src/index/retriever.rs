//! Mapping search results back to document chunks

use crate::error::Result;
use crate::types::Chunk;

use super::FlatIpIndex;

/// A chunk returned from similarity search
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    /// Chunk ordinal within the document
    pub index: u32,
    /// Chunk text
    pub content: String,
    /// Cosine similarity to the query
    pub score: f32,
}

/// Search the index with a query embedding and resolve ordinals to chunks.
///
/// Ordinals without a matching chunk are dropped; with chunks and vectors
/// inserted in lockstep that only happens if the two ever diverge.
pub fn top_chunks(
    index: &FlatIpIndex,
    chunks: &[Chunk],
    query_embedding: &[f32],
    k: usize,
) -> Result<Vec<RetrievedChunk>> {
    let hits = index.search(query_embedding, k)?;

    Ok(hits
        .into_iter()
        .filter_map(|(ordinal, score)| {
            chunks.get(ordinal).map(|chunk| RetrievedChunk {
                index: chunk.index,
                content: chunk.content.clone(),
                score,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(vectors: &[[f32; 2]]) -> (FlatIpIndex, Vec<Chunk>) {
        let mut index = FlatIpIndex::new();
        let mut chunks = Vec::new();
        for (i, v) in vectors.iter().enumerate() {
            index.insert(v).expect("insert");
            chunks.push(Chunk::new(i as u32, i * 10, format!("chunk {i}")));
        }
        (index, chunks)
    }

    #[test]
    fn resolves_ordinals_in_score_order() {
        let (index, chunks) = session(&[[1.0, 0.0], [0.0, 1.0], [0.7, 0.7]]);

        let retrieved = top_chunks(&index, &chunks, &[1.0, 0.0], 2).expect("retrieve");
        assert_eq!(retrieved.len(), 2);
        assert_eq!(retrieved[0].content, "chunk 0");
        assert_eq!(retrieved[1].content, "chunk 2");
        assert!(retrieved[0].score > retrieved[1].score);
    }

    #[test]
    fn ordinals_without_chunks_are_dropped() {
        let (index, mut chunks) = session(&[[1.0, 0.0], [0.0, 1.0]]);
        chunks.truncate(1);

        let retrieved = top_chunks(&index, &chunks, &[0.0, 1.0], 2).expect("retrieve");
        assert_eq!(retrieved.len(), 1);
        assert_eq!(retrieved[0].index, 0);
    }

    #[test]
    fn k_caps_result_count() {
        let (index, chunks) = session(&[[1.0, 0.0], [0.9, 0.1], [0.8, 0.2]]);
        let retrieved = top_chunks(&index, &chunks, &[1.0, 0.0], 1).expect("retrieve");
        assert_eq!(retrieved.len(), 1);
    }
}
