//! SDF document reader.
//!
//! quick-xml events are first folded into a small element tree (SDF
//! world files are tiny), then the tree is interpreted into a
//! [`World`]. Unknown elements are skipped with a debug log so newer
//! schema revisions stay readable.

use std::collections::BTreeMap;

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::{Error, Result};
use crate::float_types::Real;
use crate::light::{Light, LightKind};
use crate::model::{Link, Model};
use crate::physics::{Engine, EngineParams, Physics};
use crate::plugin::Plugin;
use crate::pose::Pose;
use crate::shapes::Shape;
use crate::world::{Include, World, DEFAULT_GROUP};

#[derive(Debug, Default)]
struct Element {
    name: String,
    attrs: BTreeMap<String, String>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.trim())
    }

    fn require_child(&self, name: &str, context: &str) -> Result<&Element> {
        self.child(name).ok_or_else(|| Error::MissingElement {
            element: name.to_string(),
            context: context.to_string(),
        })
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    fn require_attr(&self, name: &str, context: &str) -> Result<&str> {
        self.attr(name).ok_or_else(|| Error::MissingElement {
            element: name.to_string(),
            context: context.to_string(),
        })
    }
}

fn start_element(e: &quick_xml::events::BytesStart<'_>) -> Result<Element> {
    let mut element = Element {
        name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        ..Element::default()
    };
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::SdfParse(format!("bad attribute: {err}")))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| Error::SdfParse(format!("bad attribute value: {err}")))?
            .into_owned();
        element.attrs.insert(key, value);
    }
    Ok(element)
}

/// Fold the event stream into a tree rooted at the first element.
fn parse_tree(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut buf = Vec::new();
    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| Error::SdfParse(format!("xml error: {err}")))?;
        match event {
            Event::Start(e) => stack.push(start_element(&e)?),
            Event::Empty(e) => {
                let element = start_element(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|err| Error::SdfParse(format!("bad text: {err}")))?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Event::End(e) => {
                let closed = stack.pop().ok_or_else(|| {
                    Error::SdfParse(format!(
                        "unmatched closing tag {:?}",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(closed),
                    None => return Ok(closed),
                }
            }
            Event::Eof => {
                return Err(Error::SdfParse("no root element".to_string()));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn parse_real(text: &str, what: &str) -> Result<Real> {
    text.trim()
        .parse::<Real>()
        .map_err(|e| Error::SdfParse(format!("bad {what} value {text:?}: {e}")))
}

fn parse_bool(text: &str) -> bool {
    matches!(text.trim(), "1" | "true")
}

fn parse_reals<const N: usize>(text: &str, what: &str) -> Result<[Real; N]> {
    let values: Vec<Real> = text
        .split_whitespace()
        .map(|v| parse_real(v, what))
        .collect::<Result<_>>()?;
    values.try_into().map_err(|_| {
        Error::SdfParse(format!("{what} needs {N} values, got {text:?}"))
    })
}

fn parse_geometry(geometry: &Element) -> Result<Option<Shape>> {
    for child in &geometry.children {
        let shape = match child.name.as_str() {
            "box" => {
                let size = child.require_child("size", "box geometry")?;
                Shape::Box3 {
                    size: parse_reals::<3>(&size.text, "box size")?,
                }
            }
            "cylinder" => Shape::Cylinder {
                radius: parse_real(
                    child.require_child("radius", "cylinder geometry")?.text.as_str(),
                    "cylinder radius",
                )?,
                length: parse_real(
                    child.require_child("length", "cylinder geometry")?.text.as_str(),
                    "cylinder length",
                )?,
            },
            "sphere" => Shape::Sphere {
                radius: parse_real(
                    child.require_child("radius", "sphere geometry")?.text.as_str(),
                    "sphere radius",
                )?,
            },
            "plane" => {
                let size = child.require_child("size", "plane geometry")?;
                Shape::Plane {
                    size: parse_reals::<2>(&size.text, "plane size")?,
                }
            }
            other => {
                debug!("skipping geometry <{other}>");
                continue;
            }
        };
        return Ok(Some(shape));
    }
    Ok(None)
}

fn parse_link(element: &Element) -> Result<Link> {
    let mut link = Link {
        pose: Pose::identity(),
        collision: None,
        visual: None,
    };
    if let Some(pose) = element.child_text("pose") {
        link.pose = Pose::from_sdf_text(pose)?;
    }
    if let Some(collision) = element.child("collision") {
        link.collision = parse_geometry(collision.require_child("geometry", "collision")?)?;
    }
    if let Some(visual) = element.child("visual") {
        link.visual = parse_geometry(visual.require_child("geometry", "visual")?)?;
    }
    Ok(link)
}

fn parse_model(element: &Element) -> Result<Model> {
    let name = element.require_attr("name", "model")?;
    let mut model = Model::new(name);
    if let Some(pose) = element.child_text("pose") {
        model.pose = Pose::from_sdf_text(pose)?;
    }
    if let Some(is_static) = element.child_text("static") {
        model.is_static = parse_bool(is_static);
    }
    // The ground-plane flag has no SDF element; re-derive it from the
    // conventional model name.
    if name == "ground_plane" || name.ends_with("/ground_plane") {
        model.is_ground_plane = true;
    }
    for child in element.children.iter().filter(|c| c.name == "link") {
        let tag = child.attr("name").unwrap_or("link").to_string();
        model.add_link(tag, parse_link(child)?);
    }
    Ok(model)
}

fn parse_light(element: &Element) -> Result<Light> {
    let name = element.require_attr("name", "light")?;
    let kind = match element.attr("type") {
        Some(t) => LightKind::from_str(t)
            .ok_or_else(|| Error::SdfParse(format!("unknown light type {t:?}")))?,
        None => LightKind::Point,
    };
    let mut light = Light::new(name, kind);
    if let Some(pose) = element.child_text("pose") {
        light.pose = Pose::from_sdf_text(pose)?;
    }
    if let Some(diffuse) = element.child_text("diffuse") {
        light.diffuse = parse_reals::<4>(diffuse, "diffuse")?;
    }
    if let Some(specular) = element.child_text("specular") {
        light.specular = parse_reals::<4>(specular, "specular")?;
    }
    if let Some(cast) = element.child_text("cast_shadows") {
        light.cast_shadows = parse_bool(cast);
    }
    if let Some(attenuation) = element.child("attenuation") {
        if let Some(range) = attenuation.child_text("range") {
            light.range = parse_real(range, "attenuation range")?;
        }
    }
    Ok(light)
}

fn parse_plugin(element: &Element) -> Result<Plugin> {
    let name = element.require_attr("name", "plugin")?;
    let filename = element.require_attr("filename", "plugin")?;
    let mut plugin = Plugin::new(name, filename);
    for child in &element.children {
        plugin
            .params
            .insert(child.name.clone(), child.text.trim().to_string());
    }
    Ok(plugin)
}

fn parse_include(element: &Element) -> Result<Include> {
    let uri = element
        .require_child("uri", "include")?
        .text
        .trim()
        .to_string();
    let mut include = Include {
        uri,
        ..Include::default()
    };
    include.name = element.child_text("name").map(str::to_string);
    if let Some(pose) = element.child_text("pose") {
        include.pose = Some(Pose::from_sdf_text(pose)?);
    }
    include.is_static = element.child_text("static").map(parse_bool);
    Ok(include)
}

fn parse_physics(element: &Element) -> Result<Physics> {
    let engine = match element.attr("type") {
        Some(t) => Engine::from_str(t)?,
        None => Engine::Ode,
    };
    let mut physics = Physics::new(engine);
    if let Some(v) = element.child_text("max_step_size") {
        physics.max_step_size = parse_real(v, "max_step_size")?;
    }
    if let Some(v) = element.child_text("real_time_factor") {
        physics.real_time_factor = parse_real(v, "real_time_factor")?;
    }
    if let Some(v) = element.child_text("real_time_update_rate") {
        physics.real_time_update_rate = parse_real(v, "real_time_update_rate")?;
    }
    if let Some(v) = element.child_text("max_contacts") {
        physics.max_contacts = parse_real(v, "max_contacts")? as u32;
    }
    match (&mut physics.engine, element.child(engine.as_str())) {
        (EngineParams::Ode(ode), Some(block)) => {
            if let Some(solver) = block.child("solver") {
                if let Some(v) = solver.child_text("type") {
                    ode.solver_type = v.to_string();
                }
                if let Some(v) = solver.child_text("iters") {
                    ode.iters = parse_real(v, "iters")? as u32;
                }
                if let Some(v) = solver.child_text("sor") {
                    ode.sor = parse_real(v, "sor")?;
                }
            }
            if let Some(constraints) = block.child("constraints") {
                if let Some(v) = constraints.child_text("cfm") {
                    ode.cfm = parse_real(v, "cfm")?;
                }
                if let Some(v) = constraints.child_text("erp") {
                    ode.erp = parse_real(v, "erp")?;
                }
                if let Some(v) = constraints.child_text("contact_max_correcting_vel") {
                    ode.contact_max_correcting_vel = parse_real(v, "contact_max_correcting_vel")?;
                }
                if let Some(v) = constraints.child_text("contact_surface_layer") {
                    ode.contact_surface_layer = parse_real(v, "contact_surface_layer")?;
                }
            }
        }
        (EngineParams::Bullet(bullet), Some(block)) => {
            if let Some(solver) = block.child("solver") {
                if let Some(v) = solver.child_text("iters") {
                    bullet.iters = parse_real(v, "iters")? as u32;
                }
                if let Some(v) = solver.child_text("sor") {
                    bullet.sor = parse_real(v, "sor")?;
                }
            }
            if let Some(constraints) = block.child("constraints") {
                if let Some(v) = constraints.child_text("cfm") {
                    bullet.cfm = parse_real(v, "cfm")?;
                }
                if let Some(v) = constraints.child_text("erp") {
                    bullet.erp = parse_real(v, "erp")?;
                }
                if let Some(v) = constraints.child_text("split_impulse") {
                    bullet.split_impulse = parse_bool(v);
                }
                if let Some(v) = constraints.child_text("split_impulse_penetration_threshold") {
                    bullet.split_impulse_penetration_threshold =
                        parse_real(v, "split_impulse_penetration_threshold")?;
                }
            }
        }
        (EngineParams::Simbody(simbody), Some(block)) => {
            if let Some(v) = block.child_text("min_step_size") {
                simbody.min_step_size = parse_real(v, "min_step_size")?;
            }
            if let Some(v) = block.child_text("accuracy") {
                simbody.accuracy = parse_real(v, "accuracy")?;
            }
            if let Some(v) = block.child_text("max_transient_velocity") {
                simbody.max_transient_velocity = parse_real(v, "max_transient_velocity")?;
            }
        }
        (_, None) => {}
    }
    Ok(physics)
}

/// Split a flattened `group/name` model tag.
fn split_group(name: &str) -> (&str, &str) {
    match name.split_once('/') {
        Some((group, local)) if !group.is_empty() && !local.is_empty() => (group, local),
        _ => (DEFAULT_GROUP, name),
    }
}

/// Parse an SDF document (either `<sdf>` root or bare `<world>`) into a
/// [`World`].
pub fn from_sdf_str(xml: &str) -> Result<World> {
    let root = parse_tree(xml)?;
    let world_element = match root.name.as_str() {
        "world" => &root,
        "sdf" => root.require_child("world", "sdf document")?,
        other => {
            return Err(Error::SdfParse(format!(
                "expected <sdf> or <world> root, got <{other}>"
            )));
        }
    };

    let mut world = World::new(world_element.attr("name").unwrap_or("default"));
    for child in &world_element.children {
        match child.name.as_str() {
            "gravity" => {
                let g = parse_reals::<3>(&child.text, "gravity")?;
                world.gravity = nalgebra::Vector3::new(g[0], g[1], g[2]);
            }
            "physics" => world.physics = parse_physics(child)?,
            "model" => {
                let mut model = parse_model(child)?;
                let full = model.name().to_string();
                let (group, local) = split_group(&full);
                model.set_name(local);
                world.add_model_to(model, group);
            }
            "light" => {
                let mut light = parse_light(child)?;
                let full = light.name.clone();
                let (group, local) = split_group(&full);
                light.name = local.to_string();
                world.add_light_to(light, group);
            }
            "plugin" => world.add_plugin(parse_plugin(child)?),
            "include" => world.includes.push(parse_include(child)?),
            other => debug!("skipping world element <{other}>"),
        }
    }
    world.warn_unresolved_includes();
    Ok(world)
}
