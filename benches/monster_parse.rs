// benches/monster_parse.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bestiary_scrape::config::consts::MONSTER_PREFIX;
use bestiary_scrape::specs::{attacks, feats::FeatCatalog, listing, monster};

const MINOTAUR: &str = include_str!("../tests/fixtures/minotaur.html");
const LISTING: &str = include_str!("../tests/fixtures/listing.html");
const FEATS: &str = include_str!("../tests/fixtures/feats.html");

fn bench_monster(c: &mut Criterion) {
    let catalog = FeatCatalog::parse(FEATS);
    let url = "https://www.d20pfsrd.com/bestiary/monster-listings/monstrous-humanoids/minotaur/";

    c.bench_function("parse_monster_minotaur", |b| {
        b.iter(|| {
            let rec = monster::parse_monster(black_box(MINOTAUR), url, &catalog);
            black_box(rec.map(|r| r.stats.len()).unwrap_or(0))
        })
    });

    c.bench_function("attack_summary", |b| {
        let offense = "Melee +3 holy greatsword +27/+22/+17 (3d6+15/19-20) or slam +24 (2d8+10)\n\
                       Ranged +2 composite longbow +25/+20/+15 (2d6+8/x3 plus slaying arrow)\nSpace 10 ft.";
        b.iter(|| black_box(attacks::summarize(black_box(offense))))
    });

    c.bench_function("listing_links", |b| {
        b.iter(|| black_box(listing::monster_links(black_box(LISTING), MONSTER_PREFIX).map(|l| l.len())))
    });
}

criterion_group!(benches, bench_monster);
criterion_main!(benches);
