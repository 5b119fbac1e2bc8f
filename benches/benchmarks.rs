//! Benchmarks for the pagination core

use article_pager::layout::{materialize, plan, LayoutCache, RowSet};
use article_pager::{
    page_view, ArticleContent, ArticlePager, ContentVersion, FontMetrics, ImageSegment, ImageSize,
    MetricsMeasurer, PagerConfig, TextSegment, Viewport,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn phone_viewport() -> Viewport {
    Viewport {
        width: 375.0,
        height: 667.0,
    }
}

/// Article with `paragraphs` paragraphs and an image after every fifth
fn article(paragraphs: usize) -> ArticleContent {
    let mut segments = Vec::new();
    for i in 0..paragraphs {
        segments.push(
            TextSegment::new(
                format!(
                    "Paragraph {} contains enough text to span multiple lines and exercise the line breaker. ",
                    i
                )
                .repeat(4)
                .as_str(),
            )
            .into(),
        );
        if i % 5 == 4 {
            segments.push(ImageSegment::new(format!("img-{}.jpg", i), Some(ImageSize::new(1200.0, 800.0))).into());
        }
    }
    ArticleContent::from_segments(segments)
}

fn bench_materialize(c: &mut Criterion) {
    c.bench_function("materialize_long_article", |b| {
        let content = article(200);
        let config = PagerConfig::default();

        b.iter(|| {
            black_box(materialize(black_box(content.segments()), &config));
        });
    });
}

fn bench_plan_small(c: &mut Criterion) {
    c.bench_function("plan_small_article", |b| {
        let rows = materialize(article(5).segments(), &PagerConfig::default());
        let measurer = MetricsMeasurer::new(FontMetrics::default());

        b.iter(|| {
            black_box(plan(&rows, phone_viewport(), 18.0, &measurer));
        });
    });
}

fn bench_plan_large(c: &mut Criterion) {
    c.bench_function("plan_large_article", |b| {
        let rows = materialize(article(200).segments(), &PagerConfig::default());
        let measurer = MetricsMeasurer::new(FontMetrics::default());

        b.iter(|| {
            black_box(plan(&rows, phone_viewport(), 18.0, &measurer));
        });
    });
}

fn bench_cache_hit(c: &mut Criterion) {
    c.bench_function("layout_cache_hit", |b| {
        let rows = RowSet::new(
            ContentVersion(1),
            materialize(article(50).segments(), &PagerConfig::default()),
        );
        let measurer = MetricsMeasurer::new(FontMetrics::default());
        let mut cache = LayoutCache::new(18.0);
        cache.get_layout(&rows, phone_viewport(), &measurer);

        b.iter(|| {
            black_box(cache.get_layout(&rows, phone_viewport(), &measurer));
        });
    });
}

fn bench_page_view(c: &mut Criterion) {
    c.bench_function("page_view", |b| {
        let mut pager = ArticlePager::with_metrics(PagerConfig::default(), FontMetrics::default());
        pager.set_content(article(50));
        pager.observe_viewport(phone_viewport());
        let layout = match pager.layout() {
            Ok(layout) => layout,
            Err(err) => panic!("layout failed: {}", err),
        };
        let last = layout.page_count().saturating_sub(1);

        b.iter(|| {
            black_box(page_view(&layout, black_box(last)).ok());
        });
    });
}

criterion_group!(
    benches,
    bench_materialize,
    bench_plan_small,
    bench_plan_large,
    bench_cache_hit,
    bench_page_view,
);

criterion_main!(benches);
