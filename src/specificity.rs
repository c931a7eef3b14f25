//! Channel-level fOLD queries
//!
//! Each channel's source and detector are snapped to the closest standard
//! location, and the resulting label pair is looked up in the fOLD table.

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::channels::OptodeChannel;
use crate::config::{load_fold, FoldFiles};
use crate::error::{Error, Result};
use crate::formats::fold::FoldTable;
use crate::montage::{generate_montage_locations, Montage};
use crate::types::{Atlas, MontageKind};

/// Options shared by the specificity queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecificityOptions {
    pub atlas: Atlas,
    pub montage: MontageKind,
    /// Fall back to the closest tabulated optode pair when the snapped pair is absent
    pub interpolate: bool,
}

/// The fOLD rows matched to one channel
#[derive(Debug, Clone, Serialize)]
pub struct ChannelMatch {
    pub channel: String,
    pub source_label: String,
    pub detector_label: String,
    /// Summed optode distance to the interpolated pair; 0 for an exact match
    pub distance: f64,
    pub table: FoldTable,
}

/// Finds the fOLD rows for a single channel
///
/// The snapped `(source, detector)` pair is tried first, then the reversed
/// pair. With `interpolate`, a channel still unmatched takes the rows of the
/// tabulated pair minimising the summed optode distance in either
/// orientation.
pub fn source_detector_fold_table(
    channel: &OptodeChannel,
    reference: &Montage,
    fold: &FoldTable,
    interpolate: bool,
) -> Result<ChannelMatch> {
    let (src, _) = reference.nearest(channel.source)?;
    let (det, _) = reference.nearest(channel.detector)?;
    let (src_name, det_name) = (src.label.as_str(), det.label.as_str());

    let mut table = fold.source_detector(src_name, det_name);
    if table.is_empty() {
        table = fold.source_detector(det_name, src_name);
    }

    let mut distance = 0.0;
    if table.is_empty() && interpolate {
        debug!(
            "{}: no fOLD entry for {}-{}, picking the closest tabulated pair",
            channel.name, src_name, det_name
        );
        if let Some((source, detector, cost)) = closest_pair(channel, reference, fold) {
            warn!(
                "{}: using fOLD pair {}-{} for {}-{} ({:.1} mm off)",
                channel.name,
                source,
                detector,
                src_name,
                det_name,
                cost * 1e3
            );
            table = fold.source_detector(source, detector);
            distance = cost;
        }
    }

    debug!(
        "{}: {}-{} ({:.1} mm apart) -> {} rows",
        channel.name,
        src_name,
        det_name,
        channel.separation() * 1e3,
        table.len()
    );

    Ok(ChannelMatch {
        channel: channel.name.clone(),
        source_label: src_name.to_string(),
        detector_label: det_name.to_string(),
        distance,
        table,
    })
}

/// Tabulated pair with the smallest summed optode distance to `channel`
fn closest_pair<'a>(
    channel: &OptodeChannel,
    reference: &Montage,
    fold: &'a FoldTable,
) -> Option<(&'a str, &'a str, f64)> {
    let mut best: Option<(&str, &str, f64)> = None;

    for (source, detector) in fold.optode_pairs() {
        let (Some(s), Some(d)) = (reference.position(source), reference.position(detector)) else {
            continue;
        };
        let forward = channel.source.distance(&s) + channel.detector.distance(&d);
        let reverse = channel.source.distance(&d) + channel.detector.distance(&s);
        let cost = forward.min(reverse);

        match best {
            Some((_, _, best_cost)) if cost >= best_cost => {}
            _ => best = Some((source, detector, cost)),
        }
    }

    best
}

/// Matches every channel against the fOLD table, keeping channel order
pub fn match_channels(
    channels: &[OptodeChannel],
    reference: &Montage,
    fold: &FoldTable,
    interpolate: bool,
) -> Result<Vec<ChannelMatch>> {
    channels
        .par_iter()
        .map(|channel| source_detector_fold_table(channel, reference, fold, interpolate))
        .collect()
}

/// Specificity of `landmark` for each matched channel
///
/// Landmarks match by substring. A channel with no matching row scores 0;
/// more than one matching row is an error.
pub fn landmark_specificity(matches: &[ChannelMatch], landmark: &str) -> Result<Vec<f64>> {
    matches
        .iter()
        .map(|m| {
            let values = m.table.landmark_contains(landmark).specificities();
            match values.as_slice() {
                [] => Ok(0.0),
                [value] => Ok(*value),
                _ => Err(Error::AmbiguousSpecificity {
                    channel: m.channel.clone(),
                    count: values.len(),
                }),
            }
        })
        .collect()
}

/// Returns the fOLD rows matching each channel, in channel order
///
/// Channels are snapped to the template montage named by `options`.
pub fn fold_channel_specificity(
    channels: &[OptodeChannel],
    fold_files: Option<&FoldFiles>,
    options: SpecificityOptions,
) -> Result<Vec<FoldTable>> {
    let reference = generate_montage_locations(options.montage);
    fold_channel_specificity_with_montage(channels, fold_files, &reference, options)
}

/// Like [`fold_channel_specificity`], snapping to a caller-supplied montage
///
/// `options.montage` is ignored.
pub fn fold_channel_specificity_with_montage(
    channels: &[OptodeChannel],
    fold_files: Option<&FoldFiles>,
    reference: &Montage,
    options: SpecificityOptions,
) -> Result<Vec<FoldTable>> {
    let fold = load_fold(fold_files, options.atlas)?;
    let matches = match_channels(channels, reference, &fold, options.interpolate)?;
    Ok(matches.into_iter().map(|m| m.table).collect())
}

/// Returns the specificity, in percent, of `landmark` for each channel
pub fn fold_landmark_specificity(
    channels: &[OptodeChannel],
    landmark: &str,
    fold_files: Option<&FoldFiles>,
    options: SpecificityOptions,
) -> Result<Vec<f64>> {
    let reference = generate_montage_locations(options.montage);
    fold_landmark_specificity_with_montage(channels, landmark, fold_files, &reference, options)
}

/// Like [`fold_landmark_specificity`], snapping to a caller-supplied montage
pub fn fold_landmark_specificity_with_montage(
    channels: &[OptodeChannel],
    landmark: &str,
    fold_files: Option<&FoldFiles>,
    reference: &Montage,
    options: SpecificityOptions,
) -> Result<Vec<f64>> {
    let fold = load_fold(fold_files, options.atlas)?;
    let matches = match_channels(channels, reference, &fold, options.interpolate)?;
    landmark_specificity(&matches, landmark)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FOLD_FILE_NAMES;
    use crate::formats::fold::testing::write_fold_workbook;
    use crate::formats::fold::Value;
    use crate::montage::{Coordinate, ReferenceLocation};
    use std::path::Path;

    fn reference() -> Montage {
        generate_montage_locations(MontageKind::Standard1005)
    }

    /// Optodes sit a little above the scalp and off the template points
    fn channel(name: &str, source: &str, detector: &str) -> OptodeChannel {
        let reference = reference();
        let place = |label: &str| {
            let p = reference.position(label).unwrap().scaled(1.05);
            Coordinate::new(p.x + 0.0008, p.y - 0.0005, p.z + 0.0003)
        };
        OptodeChannel::new(name, place(source), place(detector))
    }

    fn write_fold(path: &Path) {
        write_fold_workbook(path).unwrap();
    }

    fn fold_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in FOLD_FILE_NAMES {
            write_fold(&dir.path().join(name));
        }
        dir
    }

    fn example_table() -> FoldTable {
        let dir = fold_dir();
        let files = FoldFiles::Files(vec![dir.path().join("10-5.xls")]);
        load_fold(Some(&files), Atlas::Juelich).unwrap()
    }

    #[test]
    fn test_fold_workflow() {
        let fold = example_table();
        let reference = reference();
        let ch = channel("S1_D1 760", "T7", "TP7");

        let m = source_detector_fold_table(&ch, &reference, &fold, false).unwrap();
        assert_eq!(m.source_label, "T7");
        assert_eq!(m.detector_label, "TP7");
        assert_eq!(m.distance, 0.0);

        let specificity = m.table.landmark("L Mid Orbital Gyrus").specificities();
        assert_eq!(specificity.len(), 1);
        assert!((specificity[0] - 12.34).abs() < 1e-9);
    }

    #[test]
    fn test_reversed_pair() {
        let fold = example_table();
        let ch = channel("S2_D1 760", "TP7", "T7");
        let m = source_detector_fold_table(&ch, &reference(), &fold, false).unwrap();
        assert_eq!(m.source_label, "TP7");
        assert_eq!(m.table.len(), 4);
        assert!(m.table.rows().all(|row| row.source() == Some("T7")));
    }

    #[test]
    fn test_unmatched_pair_is_empty() {
        let fold = example_table();
        let ch = channel("S3_D3 760", "O1", "PO7");
        let m = source_detector_fold_table(&ch, &reference(), &fold, false).unwrap();
        assert!(m.table.is_empty());
        assert_eq!(m.table.columns(), fold.columns());
    }

    #[test]
    fn test_interpolate_picks_closest_pair() {
        let fold = example_table();
        let ch = channel("S4_D4 760", "T7h", "TP7h");

        let exact = source_detector_fold_table(&ch, &reference(), &fold, false).unwrap();
        assert!(exact.table.is_empty());

        let m = source_detector_fold_table(&ch, &reference(), &fold, true).unwrap();
        assert_eq!(m.source_label, "T7h");
        assert!(m.distance > 0.0);
        assert_eq!(m.table.len(), 4);
        assert_eq!(m.table.optode_pairs(), vec![("T7", "TP7")]);
    }

    #[test]
    fn test_channel_specificity_from_files() {
        let dir = fold_dir();
        let channels = vec![channel("S1_D1 760", "T7", "TP7"), channel("S1_D1 850", "T7", "TP7")];

        let files = FoldFiles::Files(vec![dir.path().join("10-5.xls")]);
        let tables = fold_channel_specificity(&channels, Some(&files), SpecificityOptions::default()).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].shape(), (4, 10));
    }

    #[test]
    fn test_channel_specificity_from_directory() {
        let dir = fold_dir();
        let channels = vec![
            channel("S1_D1 760", "T7", "TP7"),
            channel("S2_D2 760", "Cz", "FCz"),
        ];

        let files = FoldFiles::Directory(dir.path().to_path_buf());
        let tables = fold_channel_specificity(&channels, Some(&files), SpecificityOptions::default()).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].shape(), (8, 10));
        assert_eq!(tables[1].shape(), (8, 10));
        assert_eq!(tables[1].rows().next().unwrap().source(), Some("Cz"));
    }

    #[test]
    fn test_channel_specificity_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = FoldFiles::Directory(dir.path().to_path_buf());
        let channels = vec![channel("S1_D1 760", "T7", "TP7")];
        let err = fold_channel_specificity(&channels, Some(&files), SpecificityOptions::default()).unwrap_err();
        assert!(err.to_string().starts_with("fold_files[0] does not exist"));
    }

    #[test]
    fn test_landmark_specificity() {
        let dir = fold_dir();
        let channels = vec![
            channel("S1_D1 760", "T7", "TP7"),
            channel("S2_D2 760", "Fp1", "AF3"),
            channel("S3_D3 760", "O1", "PO7"),
        ];

        let files = FoldFiles::Files(vec![dir.path().join("10-10.xls")]);
        let res = fold_landmark_specificity(
            &channels,
            "L Superior Frontal Gyrus",
            Some(&files),
            SpecificityOptions::default(),
        )
        .unwrap();

        assert_eq!(res.len(), channels.len());
        assert_eq!(res[0], 0.0);
        assert!((res[1] - 60.21).abs() < 1e-9);
        assert_eq!(res[2], 0.0);
        assert!(res.iter().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn test_measured_montage_changes_the_match() {
        let dir = fold_dir();
        let files = FoldFiles::Files(vec![dir.path().join("10-5.xls")]);

        // The optodes sit on measured Fp1/AF3 positions that the template
        // would snap elsewhere.
        let source = Coordinate::new(0.0, 0.0, 0.2);
        let detector = Coordinate::new(0.0, 0.2, 0.0);
        let measured = Montage::new(
            "measured",
            vec![
                ReferenceLocation::new("Fp1", source),
                ReferenceLocation::new("AF3", detector),
                ReferenceLocation::new("T7", Coordinate::new(-0.2, 0.0, 0.0)),
            ],
        );
        let channels = vec![OptodeChannel::new("S1_D1 760", source, detector)];
        let options = SpecificityOptions::default();

        let template = fold_landmark_specificity(&channels, "L Superior Frontal Gyrus", Some(&files), options).unwrap();
        assert_eq!(template, vec![0.0]);

        let scores = fold_landmark_specificity_with_montage(
            &channels,
            "L Superior Frontal Gyrus",
            Some(&files),
            &measured,
            options,
        )
        .unwrap();
        assert!((scores[0] - 60.21).abs() < 1e-9);

        let tables = fold_channel_specificity_with_montage(&channels, Some(&files), &measured, options).unwrap();
        assert_eq!(tables[0].optode_pairs(), vec![("Fp1", "AF3")]);
    }

    #[test]
    fn test_landmark_substring_ambiguity() {
        let fold = example_table();
        let matches = match_channels(&[channel("S2_D2 760", "Cz", "FCz")], &reference(), &fold, false).unwrap();

        let precentral = landmark_specificity(&matches, "L Precentral");
        assert!((precentral.unwrap()[0] - 25.0).abs() < 1e-9);

        let err = landmark_specificity(&matches, "Paracentral Lobule").unwrap_err();
        assert!(matches!(err, Error::AmbiguousSpecificity { count: 2, .. }));
    }

    #[test]
    fn test_duplicate_files_make_landmarks_ambiguous() {
        let dir = fold_dir();
        let files = FoldFiles::Directory(dir.path().to_path_buf());
        let channels = vec![channel("S1_D1 760", "T7", "TP7")];
        let result = fold_landmark_specificity(
            &channels,
            "L Mid Orbital Gyrus",
            Some(&files),
            SpecificityOptions::default(),
        );
        assert!(matches!(result, Err(Error::AmbiguousSpecificity { .. })));
    }

    #[test]
    fn test_match_preserves_order() {
        let fold = example_table();
        let channels: Vec<_> = (0..32)
            .map(|i| {
                if i % 2 == 0 {
                    channel(&format!("S{}_D1", i), "T7", "TP7")
                } else {
                    channel(&format!("S{}_D2", i), "Fp1", "AF3")
                }
            })
            .collect();
        let matches = match_channels(&channels, &reference(), &fold, false).unwrap();
        for (i, m) in matches.iter().enumerate() {
            assert_eq!(m.channel, channels[i].name);
            let expected = if i % 2 == 0 { "T7" } else { "Fp1" };
            assert_eq!(m.table.rows().next().unwrap().source(), Some(expected));
        }
    }

    #[test]
    fn test_match_keeps_extra_columns() {
        let fold = example_table();
        let m = source_detector_fold_table(&channel("S1_D1", "Fp1", "AF3"), &reference(), &fold, false).unwrap();
        let first = m.table.rows().next().unwrap();
        assert_eq!(first.get("Label ID"), Some(&Value::Number(3.0)));
    }
}
