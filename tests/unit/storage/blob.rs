use std::io::Cursor;

use super::*;

#[test]
fn chunk_stream_respects_length_and_chunk_size() {
    let stream = ChunkStream::new(Box::new(Cursor::new(b"abcdefgh".to_vec())), 7, 3);
    let chunks: Vec<Vec<u8>> = stream.collect::<RenderResult<_>>().unwrap();
    assert_eq!(chunks, [b"abc".to_vec(), b"def".to_vec(), b"g".to_vec()]);
}

#[test]
fn truncated_source_is_a_storage_error_once() {
    let mut stream = ChunkStream::new(Box::new(Cursor::new(b"ab".to_vec())), 5, 4);
    assert!(matches!(stream.next(), Some(Err(RenderError::Storage(_)))));
    assert!(stream.next().is_none());
}

#[test]
fn empty_stream_yields_nothing() {
    let stream = ChunkStream::new(Box::new(std::io::empty()), 0, 16);
    assert!(stream.is_empty());
    assert_eq!(stream.read_to_vec().unwrap(), Vec::<u8>::new());
}

#[test]
fn byte_ranges_validate_and_clamp() {
    assert!(ByteRange::new(5, 4).is_err());
    assert_eq!(ByteRange::new(2, 5).unwrap().len(), 4);
    assert_eq!(ByteRange::full(0), None);
    assert_eq!(ByteRange::full(10), Some(ByteRange { start: 0, end: 9 }));

    assert_eq!(clamp_range(None, 10).unwrap(), (0, 10));
    assert_eq!(clamp_range(Some(ByteRange { start: 8, end: 100 }), 10).unwrap(), (8, 2));
    assert!(clamp_range(Some(ByteRange { start: 10, end: 12 }), 10).is_err());
}

#[test]
fn sha256_hex_matches_known_vector() {
    assert_eq!(
        sha256_hex(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    let mut copy = DigestingCopy::new();
    let mut sink = Vec::new();
    copy.copy(&mut &b"abc"[..], &mut sink).unwrap();
    let (digest, n) = copy.finish();
    assert_eq!(n, 3);
    assert_eq!(digest, sha256_hex(b"abc"));
    assert_eq!(sink, b"abc");
}
