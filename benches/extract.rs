// benches/extract.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use bulletin_scrape::config::options::{Category, Chargeability, Preference};
use bulletin_scrape::specs::bulletin::{parse_priority_date, selector_for, FieldExtractor};

/// Bulletin-shaped page with some bulk around the table, like the live site.
fn sample_page() -> String {
    let filler: String = (0..200)
        .map(|i| format!("<div class=\"text\"><p>Paragraph {i} of notes and footnotes.</p></div>\n"))
        .collect();
    format!(
        r#"<!DOCTYPE html><html><head><title>Visa Bulletin</title></head><body>
<div class="tsg-rwd-body-frame-row"><div class="contentbody"><div class="tsg-rwd-main-copy-frame">
<div class="tsg-rwd-main-copy-body-frame withrail"><div class="tsg-rwd-content-page-parsysxxx parsys">
<div class="text"><p>Number 12</p></div><div class="text"><p>A.</p></div>
<div class="text"><p>B.</p></div><div class="text"><p>C.</p></div>
<div class="text"><div><table><tbody>
<tr><td>Employment-based</td><td>All</td><td>CHINA</td><td>INDIA</td><td>MEXICO</td><td>PHILIPPINES</td></tr>
<tr><td>1st</td><td>C</td><td>01FEB20</td><td>01JAN19</td><td>C</td><td>C</td></tr>
<tr><td>2nd</td><td>01MAR21</td><td>01APR18</td><td>15SEP11</td><td>01MAR21</td><td>01MAR21</td></tr>
<tr><td>3rd</td><td>01JUN21</td><td>01SEP19</td><td>01JUN12</td><td>01JUN21</td><td>01JUN21</td></tr>
<tr><td>Other Workers</td><td>01JAN20</td><td>01JAN15</td><td>01JUN12</td><td>01JAN20</td><td>01JAN20</td></tr>
</tbody></table></div></div>
{filler}
</div></div></div></div></div></body></html>"#
    )
}

fn bench_extract(c: &mut Criterion) {
    let doc = sample_page();
    let category = Category { preference: Preference::Third, chargeability: Chargeability::ChinaMainland };
    let extractor = FieldExtractor::new(&selector_for(category)).expect("selector compiles");

    c.bench_function("extract_cell", |b| {
        b.iter(|| black_box(extractor.extract(black_box(&doc))))
    });

    c.bench_function("parse_priority_date", |b| {
        b.iter(|| black_box(parse_priority_date(black_box("01SEP19"))))
    });

    c.bench_function("extract_and_parse", |b| {
        b.iter(|| {
            let text = extractor.extract(black_box(&doc));
            black_box(text.as_deref().map(parse_priority_date))
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
