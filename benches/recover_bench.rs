use criterion::{criterion_group, criterion_main, Criterion};
use finecheck::{recover_assessment, recover_extraction, recover_json};
use std::hint::black_box;

const CLEAN: &str = r#"{"appeal_strength":"strong","confidence_score":80,"reasoning_summary":"Medical emergencies are commonly accepted."}"#;

const FENCED: &str = "```json\n{\"appeal_strength\":\"strong\",\"confidence_score\":80,\"reasoning_summary\":\"Medical emergencies are commonly accepted.\"}\n```";

const CHATTY: &str = "Sure! Having reviewed the details of the fine, here is my assessment:\n\n```json\n{\"appeal_strength\":\"medium\",\"confidence_score\":55,\"reasoning_summary\":\"The signage issue is arguable. Photos would help.\"}\n```\n\nLet me know if you need anything else.";

const EXTRACTION: &str = "```json\n{\"fineAmount\":\"£70\",\"infractionDate\":\"2024-01-01\",\"locationAddress\":\"Main St\",\"carRegistration\":\"AB12 CDE\",\"fineReferenceNumber\":\"PCN123\"}\n```";

fn strategies_bench(c: &mut Criterion) {
    c.bench_function("recover_json_clean", |b| {
        b.iter(|| black_box(recover_json(black_box(CLEAN))))
    });
    c.bench_function("recover_json_chatty", |b| {
        b.iter(|| black_box(recover_json(black_box(CHATTY))))
    });
}

fn policies_bench(c: &mut Criterion) {
    c.bench_function("recover_assessment_fenced", |b| {
        b.iter(|| black_box(recover_assessment(black_box(FENCED))))
    });
    c.bench_function("recover_assessment_fallback", |b| {
        b.iter(|| black_box(recover_assessment(black_box("no json here at all"))))
    });
    c.bench_function("recover_extraction_fenced", |b| {
        b.iter(|| black_box(recover_extraction(black_box(EXTRACTION))))
    });
}

criterion_group!(benches, strategies_bench, policies_bench);
criterion_main!(benches);
