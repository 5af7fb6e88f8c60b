// benches/rollcall.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use rollcall_scrape::{specs::rollcall, MemberRegistry};

const POSITIONS: [&str; 4] = ["Yea", "Nay", "Not Voting", "Present"];
const STATES: [&str; 6] = ["TX", "CA", "VT", "NY", "OH", "WA"];

/// A full chamber: 100 identity/position pairs.
fn synthetic_fragment() -> String {
    let mut out = String::from(r#"<span class="contenttext">"#);
    for i in 0..100 {
        let party = if i % 2 == 0 { "R" } else { "D" };
        let name = format!("Member {}", (b'A' + (i % 26) as u8) as char).repeat(1 + i / 26);
        out.push_str(&format!(
            "{name} ({party}-{}), <b>{}</b><br>",
            STATES[i % STATES.len()],
            POSITIONS[i % POSITIONS.len()]
        ));
    }
    out.push_str("</span>");
    out
}

fn bench_rollcall(c: &mut Criterion) {
    let doc = synthetic_fragment();

    c.bench_function("entries", |b| {
        b.iter(|| black_box(rollcall::entries(black_box(&doc)).len()))
    });

    c.bench_function("parse_fresh_registry", |b| {
        b.iter(|| {
            let mut reg = MemberRegistry::new();
            let mut sink = Vec::with_capacity(100);
            let report = rollcall::parse(black_box(&doc), "1", &mut reg, &mut sink);
            black_box(report.appended)
        })
    });

    // steady state: every member already known
    let mut warm = MemberRegistry::new();
    rollcall::parse(&doc, "0", &mut warm, &mut Vec::new());
    c.bench_function("parse_warm_registry", |b| {
        b.iter(|| {
            let mut sink = Vec::with_capacity(100);
            let report = rollcall::parse(black_box(&doc), "1", &mut warm, &mut sink);
            black_box(report.appended)
        })
    });
}

criterion_group!(benches, bench_rollcall);
criterion_main!(benches);
