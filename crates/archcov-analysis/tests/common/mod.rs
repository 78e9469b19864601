//! On-disk model fixtures shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Builder for one level file.
#[derive(Debug, Default, Clone)]
pub struct LevelXml {
    blocks: Vec<String>,
    lines: Vec<String>,
}

impl LevelXml {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composite block with a `Ports` property.
    pub fn subsystem(mut self, sid: &str, name: &str, ports: &str) -> Self {
        self.blocks.push(format!(
            r#"<Block BlockType="SubSystem" Name="{name}" SID="{sid}"><P Name="Ports">{ports}</P></Block>"#
        ));
        self
    }

    pub fn block(mut self, sid: &str, name: &str, block_type: &str) -> Self {
        self.blocks.push(format!(
            r#"<Block BlockType="{block_type}" Name="{name}" SID="{sid}"/>"#
        ));
        self
    }

    pub fn inport(self, sid: &str, name: &str) -> Self {
        self.block(sid, name, "Inport")
    }

    pub fn outport(self, sid: &str, name: &str) -> Self {
        self.block(sid, name, "Outport")
    }

    pub fn raw_block(mut self, xml: &str) -> Self {
        self.blocks.push(xml.to_string());
        self
    }

    /// Single wire `src → dst` with port suffixes on both endpoints.
    pub fn wire(mut self, src: &str, dst: &str) -> Self {
        self.lines.push(format!(
            r#"<Line><P Name="Src">{src}#out:1</P><P Name="Dst">{dst}#in:1</P></Line>"#
        ));
        self
    }

    pub fn raw_line(mut self, xml: &str) -> Self {
        self.lines.push(xml.to_string());
        self
    }

    pub fn render(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<System>\n{}\n{}\n</System>\n",
            self.blocks.join("\n"),
            self.lines.join("\n")
        )
    }
}

/// A model directory laid out as `<build>/<name>/simulink/systems/`.
pub struct ModelFixture {
    pub dir: PathBuf,
}

impl ModelFixture {
    pub fn new(build_dir: &Path, name: &str) -> Self {
        let dir = build_dir.join(name);
        std::fs::create_dir_all(dir.join("simulink").join("systems")).unwrap();
        Self { dir }
    }

    pub fn systems_dir(&self) -> PathBuf {
        self.dir.join("simulink").join("systems")
    }

    pub fn root_file(&self) -> PathBuf {
        self.systems_dir().join("system_root.xml")
    }

    pub fn write_root(&self, level: &LevelXml) -> &Self {
        std::fs::write(self.root_file(), level.render()).unwrap();
        self
    }

    pub fn write_level(&self, sid: &str, level: &LevelXml) -> &Self {
        std::fs::write(self.systems_dir().join(format!("system_{sid}.xml")), level.render()).unwrap();
        self
    }

    pub fn write_raw_level(&self, sid: &str, content: &str) -> &Self {
        std::fs::write(self.systems_dir().join(format!("system_{sid}.xml")), content).unwrap();
        self
    }

    pub fn write_interface(&self, requires: &[&str], provides: &[&str]) -> &Self {
        let mut xml = String::from("<GraphicalInterface>\n");
        for name in requires {
            xml.push_str(&format!(
                "<RequireFunction><P Name=\"Name\">{name}</P></RequireFunction>\n"
            ));
        }
        for name in provides {
            xml.push_str(&format!(
                "<ProvideFunction><P Name=\"Name\">{name}</P></ProvideFunction>\n"
            ));
        }
        xml.push_str("</GraphicalInterface>\n");
        std::fs::write(self.dir.join("simulink").join("graphicalInterface.xml"), xml).unwrap();
        self
    }
}

/// Three-level model `Model`:
///
/// - L1: `A` (In, Out)
/// - L2 under A: `X` (port `u`), `Y` (port `y`); X reaches Y directly and via gain `g`
/// - L3 under X: gain `k` (ports `in`, `out`); under Y: gain `m` (port `i`)
pub fn three_level_model(build_dir: &Path) -> ModelFixture {
    let model = ModelFixture::new(build_dir, "Model");
    model.write_root(
        &LevelXml::new()
            .subsystem("1", "A", "[1, 1]")
            .inport("2", "In")
            .outport("3", "Out")
            .wire("2", "1")
            .wire("1", "3"),
    );
    model.write_level(
        "1",
        &LevelXml::new()
            .subsystem("10", "X", "[1, 0]")
            .subsystem("11", "Y", "[0, 1]")
            .block("12", "g", "Gain")
            .inport("13", "u")
            .outport("14", "y")
            .wire("13", "10")
            .wire("10", "12")
            .wire("12", "11")
            .wire("10", "11")
            .wire("11", "14"),
    );
    model.write_level(
        "10",
        &LevelXml::new()
            .inport("20", "in")
            .block("21", "k", "Gain")
            .outport("22", "out")
            .wire("20", "21")
            .wire("21", "22"),
    );
    model.write_level(
        "11",
        &LevelXml::new()
            .block("30", "m", "Gain")
            .inport("31", "i")
            .wire("31", "30"),
    );
    model
}
