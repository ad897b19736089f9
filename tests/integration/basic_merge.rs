//! Integration tests for the document merge service.

use pdfmerge::config::{CompressionLevel, MergeOptions};
use pdfmerge::io::{Blob, PdfWriter, read_inputs};
use pdfmerge::merge::{MergeService, PdfMerger};
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{page_widths, pdf_with_inherited_box, pdf_with_widths, write_fixture};

#[tokio::test]
async fn test_merge_files_read_from_disk() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_fixture(dir.path(), "a.pdf", &pdf_with_widths(&[101, 102])),
        write_fixture(dir.path(), "b.pdf", &pdf_with_widths(&[201])),
        write_fixture(dir.path(), "c.pdf", &pdf_with_widths(&[301, 302, 303])),
    ];

    let inputs = read_inputs(&paths).await.unwrap();
    assert_eq!(inputs[1].name, "b.pdf");

    let blobs = inputs.iter().map(|input| input.bytes.clone()).collect();
    let merged = PdfMerger::new().merge(blobs).await.unwrap();

    assert_eq!(page_widths(&merged.bytes), [101, 102, 201, 301, 302, 303]);
    assert_eq!(merged.report.files_merged, 3);
    assert_eq!(merged.report.total_pages, 6);
    assert_eq!(
        merged.report.input_size,
        inputs.iter().map(|input| input.size).sum::<u64>()
    );

    let stats = PdfWriter::new()
        .save(merged.bytes.clone(), dir.path(), "out.pdf")
        .await
        .unwrap();
    let written = std::fs::read(&stats.output_path).unwrap();
    assert_eq!(written, merged.bytes);
    assert_eq!(page_widths(&written).len(), 6);
}

#[tokio::test]
async fn test_merge_flattens_inherited_media_box() {
    let blobs = vec![
        Blob::from(pdf_with_inherited_box(612, 2)),
        Blob::from(pdf_with_widths(&[400])),
    ];

    let merged = PdfMerger::new().merge(blobs).await.unwrap();

    assert_eq!(page_widths(&merged.bytes), [612, 612, 400]);
}

#[rstest]
#[case::none(CompressionLevel::None)]
#[case::standard(CompressionLevel::Standard)]
#[case::maximum(CompressionLevel::Maximum)]
#[tokio::test]
async fn test_compression_levels_keep_pages(#[case] compression: CompressionLevel) {
    let merger = PdfMerger::with_options(MergeOptions {
        compression,
        jobs: None,
    });
    let blobs = vec![
        Blob::from(pdf_with_widths(&[1, 2])),
        Blob::from(pdf_with_widths(&[3])),
    ];

    let merged = merger.merge(blobs).await.unwrap();

    assert_eq!(page_widths(&merged.bytes), [1, 2, 3]);
}

#[tokio::test]
async fn test_single_worker_keeps_order() {
    let merger = PdfMerger::with_options(MergeOptions {
        compression: CompressionLevel::Standard,
        jobs: Some(1),
    });
    let blobs = (1..=5)
        .map(|i| Blob::from(pdf_with_widths(&[i * 10])))
        .collect();

    let merged = merger.merge(blobs).await.unwrap();

    assert_eq!(page_widths(&merged.bytes), [10, 20, 30, 40, 50]);
}

#[tokio::test]
async fn test_merge_is_repeatable() {
    let blobs: Vec<Blob> = vec![
        Blob::from(pdf_with_widths(&[7, 8])),
        Blob::from(pdf_with_widths(&[9])),
    ];
    let merger = PdfMerger::new();

    let first = merger.merge(blobs.clone()).await.unwrap();
    let second = merger.merge(blobs).await.unwrap();

    assert_eq!(page_widths(&first.bytes), page_widths(&second.bytes));
}

#[tokio::test]
async fn test_page_less_input_is_skipped() {
    let blobs = vec![
        Blob::from(pdf_with_widths(&[])),
        Blob::from(pdf_with_widths(&[1, 2])),
        Blob::from(pdf_with_widths(&[])),
    ];

    let merged = PdfMerger::new().merge(blobs).await.unwrap();

    assert_eq!(page_widths(&merged.bytes), [1, 2]);
    assert_eq!(merged.report.total_pages, 2);
}
