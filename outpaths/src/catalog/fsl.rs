//! FSL wrappers. Names default to NIFTI_GZ via `output_type`.

use crate::core::output_type::Family;
use crate::core::rule::{Guard, OutputRule};
use crate::core::tool::ToolSpec;

pub fn tools() -> Vec<ToolSpec> {
    vec![bet(), flirt(), smooth(), image_maths(), merge(), fast(), slice_timer()]
}

fn bet() -> ToolSpec {
    ToolSpec::new("BET", Family::Fsl)
        .inputs(&[
            "in_file", "out_file", "mask", "outline", "mesh", "skull", "frac", "robust",
        ])
        .rule(OutputRule::overridable("out_file").source("in_file").suffix("_brain"))
        .rule(
            OutputRule::new("mask_file")
                .source("out_file")
                .suffix("_mask")
                .guard(Guard::is_true("mask")),
        )
        .rule(
            OutputRule::new("outline_file")
                .source("out_file")
                .suffix("_overlay")
                .guard(Guard::is_true("outline")),
        )
        .rule(
            OutputRule::new("meshfile")
                .source("out_file")
                .suffix("_mesh")
                .force_extension(".vtk")
                .guard(Guard::is_true("mesh")),
        )
        .rule(
            OutputRule::new("skull_file")
                .source("out_file")
                .suffix("_skull")
                .guard(Guard::is_true("skull")),
        )
        .with_custom_filename()
}

fn flirt() -> ToolSpec {
    ToolSpec::new("FLIRT", Family::Fsl)
        .inputs(&[
            "in_file",
            "reference",
            "out_file",
            "out_matrix_file",
            "out_log",
            "save_log",
            "in_matrix_file",
            "apply_xfm",
        ])
        .rule(OutputRule::overridable("out_file").source("in_file").template("%s_flirt"))
        .rule(
            OutputRule::overridable("out_matrix_file")
                .source("in_file")
                .template("%s_flirt.mat")
                .keep_extension(),
        )
        .rule(
            OutputRule::overridable("out_log")
                .source("in_file")
                .template("%s_flirt.log")
                .keep_extension()
                .requires(&["save_log"]),
        )
        .with_custom_filename()
}

fn smooth() -> ToolSpec {
    ToolSpec::new("Smooth", Family::Fsl)
        .inputs(&["in_file", "sigma", "fwhm", "smoothed_file"])
        .rule(
            OutputRule::overridable("smoothed_file")
                .source("in_file")
                .template("%s_smooth")
                .keep_extension(),
        )
        .with_custom_filename()
}

fn image_maths() -> ToolSpec {
    ToolSpec::new("ImageMaths", Family::Fsl)
        .inputs(&["in_file", "in_file2", "out_file", "op_string", "out_data_type"])
        .rule(OutputRule::overridable("out_file").source("in_file").suffix("_maths"))
        .with_custom_filename()
}

fn merge() -> ToolSpec {
    ToolSpec::new("Merge", Family::Fsl)
        .inputs(&["in_files", "dimension", "tr", "merged_file"])
        .rule(
            OutputRule::overridable("merged_file")
                .source("in_files")
                .template("%s_merged"),
        )
        .with_custom_filename()
}

fn fast() -> ToolSpec {
    ToolSpec::new("FAST", Family::Fsl)
        .inputs(&[
            "in_files",
            "number_classes",
            "output_biascorrected",
            "output_biasfield",
            "no_pve",
            "segments",
        ])
        .rule(OutputRule::new("tissue_class_map").source("in_files").suffix("_seg"))
        .rule(
            OutputRule::new("partial_volume_map")
                .source("in_files")
                .suffix("_pveseg")
                .guard(Guard::absent("no_pve")),
        )
        .rule(
            OutputRule::new("mixeltype")
                .source("in_files")
                .suffix("_mixeltype")
                .guard(Guard::absent("no_pve")),
        )
        .rule(
            OutputRule::new("restored_image")
                .source("in_files")
                .suffix("_restore")
                .fan_out()
                .guard(Guard::is_true("output_biascorrected")),
        )
        .rule(
            OutputRule::new("bias_field")
                .source("in_files")
                .suffix("_bias")
                .fan_out()
                .guard(Guard::is_true("output_biasfield")),
        )
}

fn slice_timer() -> ToolSpec {
    ToolSpec::new("SliceTimer", Family::Fsl)
        .inputs(&["in_file", "out_file", "time_repetition", "interleaved"])
        .rule(
            OutputRule::new("slice_time_corrected_file")
                .field("out_file")
                .source("in_file")
                .suffix("_st"),
        )
        .with_custom_filename()
}
