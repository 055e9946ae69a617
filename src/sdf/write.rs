//! SDF document writer. Builds the XML by direct string assembly, one
//! indentation level per element depth.

use std::fmt::Write as _;

use log::warn;

use super::SDF_VERSION;
use crate::light::Light;
use crate::model::Model;
use crate::physics::{EngineParams, Physics};
use crate::plugin::Plugin;
use crate::pose::Pose;
use crate::shapes::Shape;
use crate::world::{Include, World};

struct Doc {
    out: String,
    depth: usize,
}

impl Doc {
    fn new() -> Self {
        Doc {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, tag: &str) {
        self.line(&format!("<{tag}>"));
        self.depth += 1;
    }

    fn open_attrs(&mut self, tag: &str, attrs: &str) {
        self.line(&format!("<{tag} {attrs}>"));
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth -= 1;
        self.line(&format!("</{tag}>"));
    }

    fn leaf(&mut self, tag: &str, value: impl std::fmt::Display) {
        self.line(&format!("<{tag}>{value}</{tag}>"));
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn quad(values: &[f64; 4]) -> String {
    let mut s = String::new();
    let _ = write!(s, "{} {} {} {}", values[0], values[1], values[2], values[3]);
    s
}

fn write_pose(doc: &mut Doc, pose: &Pose) {
    if *pose != Pose::identity() {
        doc.leaf("pose", pose);
    }
}

fn write_geometry(doc: &mut Doc, shape: &Shape) {
    doc.open("geometry");
    match shape {
        Shape::Box3 { size } => {
            doc.open("box");
            doc.leaf("size", format!("{} {} {}", size[0], size[1], size[2]));
            doc.close("box");
        }
        Shape::Cylinder { radius, length } => {
            doc.open("cylinder");
            doc.leaf("radius", radius);
            doc.leaf("length", length);
            doc.close("cylinder");
        }
        Shape::Sphere { radius } => {
            doc.open("sphere");
            doc.leaf("radius", radius);
            doc.close("sphere");
        }
        Shape::Plane { size } => {
            doc.open("plane");
            doc.leaf("normal", "0 0 1");
            doc.leaf("size", format!("{} {}", size[0], size[1]));
            doc.close("plane");
        }
        Shape::Mesh { .. } => {
            // Inline vertex data has no SDF form; mesh geometry needs a
            // resource URI, which this writer does not manage.
            warn!("mesh geometry skipped on SDF export");
        }
    }
    doc.close("geometry");
}

fn write_model(doc: &mut Doc, model: &Model) {
    doc.open_attrs("model", &format!("name=\"{}\"", escape(model.name())));
    write_pose(doc, &model.pose);
    doc.leaf("static", u8::from(model.is_static));
    for (tag, link) in model.links() {
        doc.open_attrs("link", &format!("name=\"{}\"", escape(tag)));
        write_pose(doc, &link.pose);
        if let Some(shape) = &link.collision {
            doc.open_attrs("collision", &format!("name=\"{tag}_collision\""));
            write_geometry(doc, shape);
            doc.close("collision");
        }
        if let Some(shape) = &link.visual {
            doc.open_attrs("visual", &format!("name=\"{tag}_visual\""));
            write_geometry(doc, shape);
            doc.close("visual");
        }
        doc.close("link");
    }
    doc.close("model");
}

fn write_light(doc: &mut Doc, light: &Light) {
    doc.open_attrs(
        "light",
        &format!(
            "name=\"{}\" type=\"{}\"",
            escape(&light.name),
            light.kind.as_str()
        ),
    );
    write_pose(doc, &light.pose);
    doc.leaf("cast_shadows", u8::from(light.cast_shadows));
    doc.leaf("diffuse", quad(&light.diffuse));
    doc.leaf("specular", quad(&light.specular));
    doc.open("attenuation");
    doc.leaf("range", light.range);
    doc.close("attenuation");
    doc.close("light");
}

fn write_physics(doc: &mut Doc, physics: &Physics) {
    let kind = physics.engine_kind();
    doc.open_attrs(
        "physics",
        &format!("name=\"default_physics\" default=\"1\" type=\"{}\"", kind.as_str()),
    );
    doc.leaf("max_step_size", physics.max_step_size);
    doc.leaf("real_time_factor", physics.real_time_factor);
    doc.leaf("real_time_update_rate", physics.real_time_update_rate);
    doc.leaf("max_contacts", physics.max_contacts);
    match &physics.engine {
        EngineParams::Ode(ode) => {
            doc.open("ode");
            doc.open("solver");
            doc.leaf("type", &ode.solver_type);
            doc.leaf("iters", ode.iters);
            doc.leaf("sor", ode.sor);
            doc.close("solver");
            doc.open("constraints");
            doc.leaf("cfm", ode.cfm);
            doc.leaf("erp", ode.erp);
            doc.leaf("contact_max_correcting_vel", ode.contact_max_correcting_vel);
            doc.leaf("contact_surface_layer", ode.contact_surface_layer);
            doc.close("constraints");
            doc.close("ode");
        }
        EngineParams::Bullet(bullet) => {
            doc.open("bullet");
            doc.open("solver");
            doc.leaf("iters", bullet.iters);
            doc.leaf("sor", bullet.sor);
            doc.close("solver");
            doc.open("constraints");
            doc.leaf("cfm", bullet.cfm);
            doc.leaf("erp", bullet.erp);
            doc.leaf("split_impulse", u8::from(bullet.split_impulse));
            doc.leaf(
                "split_impulse_penetration_threshold",
                bullet.split_impulse_penetration_threshold,
            );
            doc.close("constraints");
            doc.close("bullet");
        }
        EngineParams::Simbody(simbody) => {
            doc.open("simbody");
            doc.leaf("min_step_size", simbody.min_step_size);
            doc.leaf("accuracy", simbody.accuracy);
            doc.leaf("max_transient_velocity", simbody.max_transient_velocity);
            doc.close("simbody");
        }
    }
    doc.close("physics");
}

fn write_plugin(doc: &mut Doc, plugin: &Plugin) {
    doc.open_attrs(
        "plugin",
        &format!(
            "name=\"{}\" filename=\"{}\"",
            escape(&plugin.name),
            escape(&plugin.filename)
        ),
    );
    for (key, value) in &plugin.params {
        doc.leaf(key, escape(value));
    }
    doc.close("plugin");
}

fn write_include(doc: &mut Doc, include: &Include) {
    doc.open("include");
    doc.leaf("uri", escape(&include.uri));
    if let Some(name) = &include.name {
        doc.leaf("name", escape(name));
    }
    if let Some(pose) = &include.pose {
        doc.leaf("pose", pose);
    }
    if let Some(is_static) = include.is_static {
        doc.leaf("static", u8::from(is_static));
    }
    doc.close("include");
}

/// Render `world` as a full SDF document. The two flags append the
/// stock `model://ground_plane` and `model://sun` includes.
pub fn to_sdf(world: &World, with_default_ground_plane: bool, with_default_sun: bool) -> String {
    let mut doc = Doc::new();
    doc.line("<?xml version=\"1.0\"?>");
    doc.open_attrs("sdf", &format!("version=\"{SDF_VERSION}\""));
    doc.open_attrs("world", &format!("name=\"{}\"", escape(&world.name)));

    doc.leaf(
        "gravity",
        format!("{} {} {}", world.gravity.x, world.gravity.y, world.gravity.z),
    );
    write_physics(&mut doc, &world.physics);

    if with_default_ground_plane {
        write_include(
            &mut doc,
            &Include {
                uri: "model://ground_plane".to_string(),
                ..Include::default()
            },
        );
    }
    if with_default_sun {
        write_include(
            &mut doc,
            &Include {
                uri: "model://sun".to_string(),
                ..Include::default()
            },
        );
    }
    for include in &world.includes {
        write_include(&mut doc, include);
    }

    for model in world.models() {
        write_model(&mut doc, &model);
    }
    for light in world.lights() {
        write_light(&mut doc, &light);
    }
    for plugin in world.plugins() {
        write_plugin(&mut doc, plugin);
    }

    doc.close("world");
    doc.close("sdf");
    doc.out
}
