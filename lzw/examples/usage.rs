use anyhow::Result;
use gif_lzw::{decoder::GifStyleDecoder, pool::TablePool};

const TEXT: &[u8] = b"TOBEORNOTTOBEORTOBEORNOT#";

fn main() -> Result<()> {
    let compressed = weezl::encode::Encoder::new(weezl::BitOrder::Lsb, 7).encode(TEXT)?;

    let decompressed = GifStyleDecoder::decode_to_vec(&compressed, 7)?;
    assert_eq!(decompressed, TEXT);

    // Code table storage is kept by the pool between calls.
    let pool = TablePool::with_limit(1);
    for _ in 0..3 {
        let mut decompressed = vec![];
        GifStyleDecoder::decode_with_pool(&compressed[..], &mut decompressed, 7, &pool)?;
        assert_eq!(decompressed, TEXT);
    }
    assert_eq!(pool.idle_count(), 1);

    Ok(())
}
