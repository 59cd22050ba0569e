#![no_main]
use libfuzzer_sys::fuzz_target;
use relay_sse::{FrameDecoder, Utf8Decoder};

fuzz_target!(|data: &[u8]| {
    // First byte picks the segment size; the rest is the body.
    let Some((&size, body)) = data.split_first() else {
        return;
    };
    let size = usize::from(size).max(1);

    let mut utf8 = Utf8Decoder::new();
    let mut decoder = FrameDecoder::new();
    let mut chunked = Vec::new();
    for segment in body.chunks(size) {
        let text = utf8.decode(segment);
        decoder.feed(&text, |frame| chunked.push(frame));
    }

    let whole = String::from_utf8_lossy(body);
    let mut once = Vec::new();
    FrameDecoder::new().feed(&whole, |frame| once.push(frame));

    if utf8.pending_len() == 0 {
        assert_eq!(chunked, once);
    }
});
