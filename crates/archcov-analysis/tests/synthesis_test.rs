//! Port attachment, interface ports and subsystem strength.

mod common;

use archcov_analysis::level::{select_blocks, LevelFile};
use archcov_analysis::synthesis::{
    LevelEmission, PortDirection, PortKind, PortSynthesizer, SubsystemStrength,
};
use archcov_core::config::AnalysisConfig;

use common::{LevelXml, ModelFixture};

fn synthesize(file: &LevelFile, level: u32, config: &AnalysisConfig) -> LevelEmission {
    let parent = (level > 1).then_some("P");
    let selected = select_blocks(file, level, parent);
    PortSynthesizer::new(config).synthesize(file, level, "Model", &selected)
}

fn port_names(emission: &LevelEmission, block: &str) -> Vec<String> {
    emission
        .blocks
        .iter()
        .find(|b| b.name == block)
        .map(|b| b.ports.iter().map(|p| p.name.clone()).collect())
        .unwrap_or_default()
}

fn strengths(emission: &LevelEmission, block: &str) -> Vec<(String, u32)> {
    emission
        .blocks
        .iter()
        .find(|b| b.name == block)
        .map(|b| {
            b.strengths
                .iter()
                .map(|s: &SubsystemStrength| (s.target_name.clone(), s.value))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_ports_attach_once_per_owner_in_wire_order() {
    let dir = tempfile::tempdir().unwrap();
    let model = ModelFixture::new(dir.path(), "Model");
    model.write_root(
        &LevelXml::new()
            .subsystem("1", "A", "[1, 1]")
            .subsystem("4", "B", "[1, 1]")
            .inport("2", "In")
            .outport("3", "Out")
            .wire("2", "1")
            .wire("1", "3")
            .wire("1", "3")
            .wire("2", "4")
            .wire("4", "3"),
    );
    model.write_interface(&["Req"], &["Prov"]);

    let file = LevelFile::load(&model.root_file()).unwrap();
    let emission = synthesize(&file, 1, &AnalysisConfig::default());

    assert_eq!(emission.level, 1);
    assert_eq!(emission.model_name, "Model");
    assert_eq!(port_names(&emission, "A"), vec!["In", "Out"]);
    // Interface ports belong to the last level-1 block.
    assert_eq!(port_names(&emission, "B"), vec!["In", "Out", "Req", "Prov"]);

    let b = &emission.blocks[1];
    assert_eq!(b.ports[0].direction, PortDirection::Inport);
    assert_eq!(b.ports[0].kind, PortKind::Structural);
    assert_eq!(b.ports[2].kind, PortKind::Interface);
    assert_eq!(b.ports[2].direction, PortDirection::Inport);
    assert_eq!(b.ports[2].sid, "unknown");
    assert_eq!(b.ports[3].direction, PortDirection::Outport);
    assert!(emission.blocks.iter().all(|b| b.strengths.is_empty()));
}

#[test]
fn test_missing_interface_descriptor_degrades_gracefully() {
    let dir = tempfile::tempdir().unwrap();
    let model = ModelFixture::new(dir.path(), "Model");
    model.write_root(
        &LevelXml::new()
            .subsystem("1", "A", "[1]")
            .inport("2", "In")
            .wire("2", "1"),
    );

    let file = LevelFile::load(&model.root_file()).unwrap();
    let emission = synthesize(&file, 1, &AnalysisConfig::default());
    assert_eq!(port_names(&emission, "A"), vec!["In"]);
}

fn strength_level() -> LevelFile {
    let dir = tempfile::tempdir().unwrap();
    let model = ModelFixture::new(dir.path(), "Model");
    model.write_level(
        "1",
        &LevelXml::new()
            .subsystem("10", "X", "[1]")
            .subsystem("11", "Y", "[1]")
            .subsystem("15", "Z", "[1]")
            .block("12", "g", "Gain")
            .block("16", "h", "Gain")
            .block("17", "k", "Gain")
            // X -> g -> Y and X -> g -> h -> Y: one first-hop wire
            .wire("10", "12")
            .wire("12", "11")
            .wire("12", "16")
            .wire("16", "11")
            // two parallel direct wires
            .wire("10", "11")
            .wire("10", "11")
            // Z loops back onto itself through k, and reaches Y through h
            .wire("15", "17")
            .wire("17", "15")
            .wire("15", "16")
            // Y -> Z: chains stop at the first composite reached
            .wire("11", "15"),
    );
    LevelFile::load(&model.systems_dir().join("system_1.xml")).unwrap()
}

#[test]
fn test_strength_counts_first_hop_multiplicity_once_per_target() {
    let emission = synthesize(&strength_level(), 2, &AnalysisConfig::default());

    assert_eq!(strengths(&emission, "X"), vec![("Y".to_string(), 3)]);
    assert_eq!(strengths(&emission, "Y"), vec![("Z".to_string(), 1)]);
    // Z reaches itself through k: never reported.
    assert_eq!(strengths(&emission, "Z"), vec![("Y".to_string(), 1)]);
}

#[test]
fn test_strengths_are_sorted_by_target_name() {
    let dir = tempfile::tempdir().unwrap();
    let model = ModelFixture::new(dir.path(), "Model");
    model.write_level(
        "1",
        &LevelXml::new()
            .subsystem("1", "Src", "[1]")
            .subsystem("2", "Zeta", "[1]")
            .subsystem("3", "Alpha", "[1]")
            .subsystem("4", "Alpha", "[1]")
            .wire("1", "2")
            .wire("1", "4")
            .wire("1", "3"),
    );
    let file = LevelFile::load(&model.systems_dir().join("system_1.xml")).unwrap();
    let emission = synthesize(&file, 2, &AnalysisConfig::default());

    let src = &emission.blocks[0];
    let order: Vec<(&str, &str)> = src
        .strengths
        .iter()
        .map(|s| (s.target_name.as_str(), s.target_sid.as_str()))
        .collect();
    assert_eq!(order, vec![("Alpha", "3"), ("Alpha", "4"), ("Zeta", "2")]);
    assert!(src.strengths.iter().all(|s| s.source_sid == "1"));
}

#[test]
fn test_level_one_never_derives_strength() {
    let emission = synthesize(&strength_level(), 1, &AnalysisConfig::default());
    assert!(emission.blocks.iter().all(|b| b.strengths.is_empty()));
}

#[test]
fn test_virtual_ports_for_block_to_block_wires() {
    let dir = tempfile::tempdir().unwrap();
    let model = ModelFixture::new(dir.path(), "Model");
    model.write_level(
        "1",
        &LevelXml::new()
            .subsystem("10", "X", "[1]")
            .subsystem("11", "Y", "[1]")
            .block("12", "g", "Gain")
            .inport("13", "u")
            .wire("13", "10")
            .wire("10", "11")
            .wire("10", "11")
            .wire("10", "12"),
    );
    let file = LevelFile::load(&model.systems_dir().join("system_1.xml")).unwrap();

    let plain = synthesize(&file, 2, &AnalysisConfig::default());
    assert_eq!(port_names(&plain, "X"), vec!["u"]);

    let config = AnalysisConfig {
        virtual_ports: Some(true),
        ..Default::default()
    };
    let emission = synthesize(&file, 2, &config);
    assert_eq!(port_names(&emission, "X"), vec!["u", "X->Y_1", "X->Y_2", "X->g"]);
    assert_eq!(port_names(&emission, "Y"), vec!["X->Y_1", "X->Y_2"]);

    let x = &emission.blocks[0];
    assert!(x.ports[1].is_virtual);
    assert_eq!(x.ports[1].sid, "10->11");
    assert_eq!(x.ports[1].direction, PortDirection::Outport);
    assert_eq!(emission.blocks[1].ports[0].direction, PortDirection::Inport);
}
