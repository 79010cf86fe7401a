//! AFNI wrappers. `outputtype` defaults to AFNI, whose extension is empty.

use crate::core::output_type::Family;
use crate::core::rule::{Guard, OutputRule};
use crate::core::tool::ToolSpec;

pub fn tools() -> Vec<ToolSpec> {
    vec![allineate(), automask(), tshift(), calc(), skull_strip(), volreg()]
}

fn allineate() -> ToolSpec {
    ToolSpec::new("Allineate", Family::Afni)
        .inputs(&[
            "in_file",
            "reference",
            "out_file",
            "out_matrix",
            "out_param_file",
            "allcostx",
            "in_matrix",
        ])
        .rule(
            OutputRule::overridable("out_file")
                .source("in_file")
                .template("%s_allineate")
                .xor(&["allcostx"]),
        )
        // The transform matrix ignores `outputtype`.
        .rule(
            OutputRule::overridable("out_matrix")
                .source("in_file")
                .template("%s_allineate")
                .force_extension(".aff12.1D")
                .xor(&["allcostx"]),
        )
        .rule(
            OutputRule::overridable("out_param_file")
                .source("in_file")
                .template("%s_allineate")
                .force_extension(".param.1D")
                .guard(Guard::present("out_param_file")),
        )
        .rule(OutputRule::overridable("allcostx").guard(Guard::present("allcostx")))
        .with_custom_filename()
}

fn automask() -> ToolSpec {
    ToolSpec::new("Automask", Family::Afni)
        .inputs(&["in_file", "out_file", "brain_file", "clfrac", "dilate"])
        .rule(OutputRule::overridable("out_file").source("in_file").template("%s_mask"))
        .rule(
            OutputRule::overridable("brain_file")
                .source("in_file")
                .template("%s_masked"),
        )
}

fn tshift() -> ToolSpec {
    ToolSpec::new("TShift", Family::Afni)
        .inputs(&["in_file", "out_file", "tr", "tzero", "tslice", "slice_timing"])
        .rule(OutputRule::overridable("out_file").source("in_file").template("%s_tshift"))
}

fn calc() -> ToolSpec {
    ToolSpec::new("Calc", Family::Afni)
        .inputs(&["in_file_a", "in_file_b", "in_file_c", "expr", "out_file"])
        .rule(OutputRule::overridable("out_file").source("in_file_a").template("%s_calc"))
}

fn skull_strip() -> ToolSpec {
    ToolSpec::new("SkullStrip", Family::Afni)
        .inputs(&["in_file", "out_file"])
        .rule(
            OutputRule::overridable("out_file")
                .source("in_file")
                .template("%s_skullstrip"),
        )
}

fn volreg() -> ToolSpec {
    ToolSpec::new("Volreg", Family::Afni)
        .inputs(&[
            "in_file",
            "basefile",
            "out_file",
            "md1d_file",
            "oned_file",
            "oned_matrix_save",
        ])
        .rule(OutputRule::overridable("out_file").source("in_file").template("%s_volreg"))
        .rule(
            OutputRule::overridable("md1d_file")
                .source("in_file")
                .template("%s_md.1D")
                .keep_extension(),
        )
        .rule(
            OutputRule::overridable("oned_file")
                .source("in_file")
                .template("%s.1D")
                .keep_extension(),
        )
        .rule(
            OutputRule::overridable("oned_matrix_save")
                .source("in_file")
                .template("%s.aff12.1D")
                .keep_extension(),
        )
}
