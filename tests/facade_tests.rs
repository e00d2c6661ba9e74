use seqscan::{FrameSelection, ScanConfig, Scanner};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_scan_through_facade() {
    let temp = TempDir::new().unwrap();
    for frame in [1, 2, 3, 7] {
        fs::write(temp.path().join(format!("fx_{frame:03}.exr")), "").unwrap();
    }

    let config = ScanConfig::builder()
        .root(temp.path())
        .selection(FrameSelection::Leftmost)
        .build()
        .unwrap();
    let scanner = Scanner::with_config(config).unwrap();

    assert_eq!(scanner.len(), 1);
    let seq = &scanner.result.seqs[0];
    assert_eq!(seq.to_string(), "Seq(\"fx_###.exr\", range: 1-7, missed: 3)");
    assert_eq!(seq.missing_frames().collect::<Vec<_>>(), vec![4, 5, 6]);
}
