use gif_lzw::{decoder::GifStyleDecoder, pool::TablePool};
use rand::{prelude::StdRng, Rng, SeedableRng};

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[test]
fn decompress_noise_pooled() {
    let mut rand = StdRng::seed_from_u64(42);
    let data: Vec<u8> = (0..1 << 18).map(|_| rand.gen_range(0..64)).collect();
    let encoded = weezl::encode::Encoder::new(weezl::BitOrder::Lsb, 6)
        .encode(&data)
        .unwrap();
    let pool = TablePool::with_limit(1);

    let _profiler = dhat::Profiler::builder().testing().build();

    GifStyleDecoder::decode_with_pool(&encoded[..], std::io::sink(), 6, &pool).unwrap();
    let first_stats = dhat::HeapStats::get();

    for _ in 0..8 {
        GifStyleDecoder::decode_with_pool(&encoded[..], std::io::sink(), 6, &pool).unwrap();
    }
    let stats = dhat::HeapStats::get();

    println!("{first_stats:?}");
    println!("{stats:?}");

    // Later calls reuse the table of the first one.
    dhat::assert_eq!(first_stats.total_blocks, stats.total_blocks);
}
