//! FreeSurfer wrappers.

use crate::core::output_type::Family;
use crate::core::rule::{Guard, OutputRule};
use crate::core::tool::ToolSpec;

pub fn tools() -> Vec<ToolSpec> {
    vec![mri_convert(), apply_vol_transform(), seg_stats(), binarize()]
}

fn mri_convert() -> ToolSpec {
    ToolSpec::new("MRIConvert", Family::Freesurfer)
        .inputs(&["in_file", "out_file", "in_type", "out_type", "conform"])
        .rule(OutputRule::overridable("out_file").source("in_file").suffix("_out"))
        .with_custom_filename()
}

fn apply_vol_transform() -> ToolSpec {
    ToolSpec::new("ApplyVolTransform", Family::Freesurfer)
        .inputs(&[
            "source_file",
            "target_file",
            "fs_target",
            "reg_file",
            "transformed_file",
        ])
        .rule(
            OutputRule::overridable("transformed_file")
                .source("source_file")
                .template("%s_warped")
                .keep_extension(),
        )
        .with_custom_filename()
}

/// Bool-or-file outputs: `true` asks for the default name, a string names it.
fn seg_stats() -> ToolSpec {
    ToolSpec::new("SegStats", Family::Freesurfer)
        .inputs(&[
            "in_file",
            "segmentation_file",
            "summary_file",
            "avgwf_txt_file",
            "avgwf_file",
            "sf_avg_file",
        ])
        .rule(
            OutputRule::overridable("summary_file")
                .template("summary.stats")
                .keep_extension(),
        )
        .rule(
            OutputRule::overridable("avgwf_txt_file")
                .source("in_file")
                .template("%s_avgwf")
                .force_extension(".txt")
                .guard(Guard::present("avgwf_txt_file")),
        )
        .rule(
            OutputRule::overridable("avgwf_file")
                .source("in_file")
                .template("%s_avgwf")
                .force_extension(".nii.gz")
                .guard(Guard::present("avgwf_file")),
        )
        .rule(
            OutputRule::overridable("sf_avg_file")
                .template("sf_avg.txt")
                .keep_extension()
                .guard(Guard::present("sf_avg_file")),
        )
        .with_custom_filename()
}

fn binarize() -> ToolSpec {
    ToolSpec::new("Binarize", Family::Freesurfer)
        .inputs(&["in_file", "binary_file", "match", "min", "max"])
        .rule(
            OutputRule::overridable("binary_file")
                .source("in_file")
                .suffix("_thresh")
                .keep_extension(),
        )
        .with_custom_filename()
}
