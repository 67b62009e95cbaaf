//! Positional batching of the image list.

use crate::types::ImageRef;

/// Number of batches needed for `len` images at `limit` per batch.
pub fn batch_count(len: usize, limit: usize) -> usize {
    len.div_ceil(limit.max(1))
}

/// Split `images` into consecutive batches of at most `limit` images.
///
/// Only the last batch may be shorter. A `limit` of zero is treated as one.
pub fn batches(images: &[ImageRef], limit: usize) -> std::slice::Chunks<'_, ImageRef> {
    images.chunks(limit.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(n: usize) -> Vec<ImageRef> {
        (0..n).map(|i| format!("img-{i}")).collect()
    }

    #[test]
    fn test_batch_count() {
        assert_eq!(batch_count(0, 128), 0);
        assert_eq!(batch_count(1, 128), 1);
        assert_eq!(batch_count(128, 128), 1);
        assert_eq!(batch_count(129, 128), 2);
        assert_eq!(batch_count(256, 128), 2);
        assert_eq!(batch_count(3, 0), 3);
    }

    #[test]
    fn test_batches_split_with_remainder() {
        let images: Vec<ImageRef> = vec!["a".into(), "b".into(), "c".into()];
        let split: Vec<&[ImageRef]> = batches(&images, 2).collect();
        assert_eq!(split.len(), 2);
        assert_eq!(split[0], &["a".to_string(), "b".to_string()][..]);
        assert_eq!(split[1], &["c".to_string()][..]);
    }

    #[test]
    fn test_batches_are_lossless_and_ordered() {
        let images = refs(300);
        let split: Vec<&[ImageRef]> = batches(&images, 128).collect();
        assert_eq!(split.len(), batch_count(images.len(), 128));
        assert!(split.iter().all(|b| b.len() <= 128));
        assert_eq!(split.last().map(|b| b.len()), Some(44));

        let rejoined: Vec<ImageRef> = split.concat();
        assert_eq!(rejoined, images);
    }

    #[test]
    fn test_batches_empty_input() {
        let images: Vec<ImageRef> = Vec::new();
        assert_eq!(batches(&images, 128).count(), 0);
    }
}
