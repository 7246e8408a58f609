//! Sliding-window document splitter
//!
//! Produces overlapping character windows with stable, deterministic chunk
//! ids of the form `<document_id>#chunk-<index>`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use docqa_core::{Chunk, Document};

use crate::TextError;

/// Splitter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Window size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive windows in characters
    pub chunk_overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            chunk_overlap: 120,
        }
    }
}

impl From<&docqa_config::RetrievalSettings> for SplitterConfig {
    fn from(settings: &docqa_config::RetrievalSettings) -> Self {
        Self {
            chunk_size: settings.chunk_size,
            chunk_overlap: settings.chunk_overlap,
        }
    }
}

/// Splits documents into overlapping chunks.
pub struct TextSplitter {
    config: SplitterConfig,
}

impl TextSplitter {
    /// Create a splitter, validating the window configuration.
    ///
    /// Requires `chunk_size > 0` and `chunk_overlap < chunk_size`.
    pub fn new(config: SplitterConfig) -> Result<Self, TextError> {
        if config.chunk_size == 0 || config.chunk_overlap >= config.chunk_size {
            return Err(TextError::InvalidConfig(format!(
                "chunk_size={} chunk_overlap={}",
                config.chunk_size, config.chunk_overlap
            )));
        }
        Ok(Self { config })
    }

    /// Split each document into overlapping windows.
    ///
    /// Text is trimmed first; whitespace-only documents produce no chunks.
    /// Windows are measured in characters so multi-byte text never splits
    /// inside a code point. Chunk metadata inherits the document metadata
    /// plus `document_id` and `chunk_index`.
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let step = self.config.chunk_size - self.config.chunk_overlap;
        let mut chunks = Vec::new();

        for doc in documents {
            let text: Vec<char> = doc.text.trim().chars().collect();
            if text.is_empty() {
                continue;
            }

            let mut offset = 0;
            let mut index = 0;
            while offset < text.len() {
                let end = (offset + self.config.chunk_size).min(text.len());
                let piece: String = text[offset..end].iter().collect();

                let mut metadata = doc.metadata.clone();
                metadata.insert("document_id".to_string(), Value::from(doc.id.clone()));
                metadata.insert("chunk_index".to_string(), Value::from(index));

                chunks.push(Chunk {
                    id: format!("{}#chunk-{}", doc.id, index),
                    text: piece,
                    metadata,
                });

                offset += step;
                index += 1;
            }
        }

        tracing::debug!(documents = documents.len(), chunks = chunks.len(), "split documents");
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(chunk_size: usize, chunk_overlap: usize) -> TextSplitter {
        TextSplitter::new(SplitterConfig {
            chunk_size,
            chunk_overlap,
        })
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(TextSplitter::new(SplitterConfig {
            chunk_size: 0,
            chunk_overlap: 0
        })
        .is_err());
        assert!(TextSplitter::new(SplitterConfig {
            chunk_size: 10,
            chunk_overlap: 10
        })
        .is_err());
        assert!(TextSplitter::new(SplitterConfig {
            chunk_size: 10,
            chunk_overlap: 20
        })
        .is_err());
    }

    #[test]
    fn test_config_from_settings() {
        let settings = docqa_config::RetrievalSettings {
            chunk_size: 200,
            chunk_overlap: 40,
            ..Default::default()
        };

        let config = SplitterConfig::from(&settings);
        assert_eq!(config.chunk_size, 200);
        assert_eq!(config.chunk_overlap, 40);
    }

    #[test]
    fn test_empty_document_yields_no_chunks() {
        let s = splitter(5, 2);
        let docs = vec![Document::new("d", "   \n\t ")];
        assert!(s.split_documents(&docs).is_empty());
    }

    #[test]
    fn test_chunk_ids_and_metadata() {
        let s = splitter(4, 1);
        let docs = vec![Document::new("doc", "abcdefgh")];
        let chunks = s.split_documents(&docs);

        assert_eq!(chunks[0].id, "doc#chunk-0");
        assert_eq!(chunks[1].id, "doc#chunk-1");
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.metadata["document_id"], serde_json::json!("doc"));
            assert_eq!(chunk.metadata["chunk_index"], serde_json::json!(i));
        }
    }

    #[test]
    fn test_windows_overlap() {
        let s = splitter(4, 2);
        let docs = vec![Document::new("d", "abcdefg")];
        let chunks = s.split_documents(&docs);

        // step = 2: windows at 0, 2, 4, 6
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].text, "abcd");
        assert_eq!(chunks[1].text, "cdef");
        assert_eq!(chunks[2].text, "efg");
        assert_eq!(chunks[3].text, "g");
    }

    #[test]
    fn test_reconstruction_with_overlap_removed() {
        let text = "the quick brown fox jumps over the lazy dog";
        let s = splitter(10, 3);
        let docs = vec![Document::new("d", text)];
        let chunks = s.split_documents(&docs);

        let mut rebuilt = chunks[0].text.clone();
        for chunk in &chunks[1..] {
            let keep: String = chunk.text.chars().skip(3).collect();
            rebuilt.push_str(&keep);
        }
        // Trailing windows shorter than the overlap contribute nothing new
        assert!(rebuilt.starts_with(text));
        assert_eq!(&rebuilt[..text.len()], text);
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundaries() {
        let s = splitter(3, 1);
        let docs = vec![Document::new("d", "日本語のテキスト")];
        let chunks = s.split_documents(&docs);

        assert_eq!(chunks[0].text.chars().count(), 3);
        assert_eq!(chunks[0].text, "日本語");
        assert_eq!(chunks[1].text, "語のテ");
    }

    #[test]
    fn test_chunk_count_for_exact_cover() {
        // length 9, window 5, overlap 2 -> step 3 -> offsets 0,3,6
        let s = splitter(5, 2);
        let docs = vec![Document::new("d", "abcdefghi")];
        assert_eq!(s.split_documents(&docs).len(), 3);
    }
}
