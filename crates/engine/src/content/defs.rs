use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use crate::sim::{ActionClip, ClipSet, ANIM_CADENCE_DEFAULT};
use crate::sprite_keys::validate_sprite_key;

use super::library::{RoleDef, RoleDefId, RoleLibrary};

/// The one effect def every def set must declare: grenades resolve their
/// blast clip through it.
pub(crate) const EXPLOSION_EFFECT_NAME: &str = "explosion";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefErrorCode {
    ReadFile,
    XmlMalformed,
    InvalidRoot,
    UnknownDefType,
    UnknownField,
    UnknownAttribute,
    DuplicateField,
    DuplicateDef,
    MissingField,
    MissingDef,
    InvalidValue,
}

#[derive(Debug, Clone)]
pub struct DefCompileError {
    pub code: DefErrorCode,
    pub message: String,
    pub file_path: PathBuf,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for DefCompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (file={}, line={}, column={})",
                self.code,
                self.message,
                self.file_path.display(),
                loc.line,
                loc.column
            ),
            None => write!(
                f,
                "{:?}: {} (file={})",
                self.code,
                self.message,
                self.file_path.display()
            ),
        }
    }
}

impl std::error::Error for DefCompileError {}

#[derive(Debug, Clone)]
struct PendingRoleDef {
    def_name: String,
    label: String,
    clips: ClipSet,
}

#[derive(Debug, Clone)]
struct PendingEffectDef {
    def_name: String,
    clip: ActionClip,
}

/// Compiles the given def XML files into a [`RoleLibrary`]. Role ids are
/// assigned by def name order, so the same sources always produce the same
/// ids regardless of authoring order.
pub fn compile_role_library(xml_files: &[PathBuf]) -> Result<RoleLibrary, DefCompileError> {
    let mut roles = Vec::<PendingRoleDef>::new();
    let mut effects = Vec::<PendingEffectDef>::new();
    let mut seen_names = HashSet::<String>::new();

    for xml_file in xml_files {
        let raw = fs::read_to_string(xml_file).map_err(|source| DefCompileError {
            code: DefErrorCode::ReadFile,
            message: format!("failed to read def XML file: {source}"),
            file_path: xml_file.clone(),
            location: None,
        })?;
        parse_defs_document(xml_file, &raw, &mut roles, &mut effects, &mut seen_names)?;
    }

    let explosion_clip = effects
        .iter()
        .find(|effect| effect.def_name == EXPLOSION_EFFECT_NAME)
        .map(|effect| effect.clip.clone())
        .ok_or_else(|| DefCompileError {
            code: DefErrorCode::MissingDef,
            message: format!("missing required <EffectDef> '{EXPLOSION_EFFECT_NAME}'"),
            file_path: xml_files.first().cloned().unwrap_or_default(),
            location: None,
        })?;

    roles.sort_by(|a, b| a.def_name.cmp(&b.def_name));
    let role_defs = roles
        .into_iter()
        .map(|role| RoleDef {
            id: RoleDefId(0),
            def_name: role.def_name,
            label: role.label,
            clips: role.clips,
        })
        .collect();
    Ok(RoleLibrary::from_parts(role_defs, explosion_clip))
}

fn parse_defs_document(
    file_path: &Path,
    raw: &str,
    roles: &mut Vec<PendingRoleDef>,
    effects: &mut Vec<PendingEffectDef>,
    seen_names: &mut HashSet<String>,
) -> Result<(), DefCompileError> {
    let doc = Document::parse(raw).map_err(|error| DefCompileError {
        code: DefErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "Defs" {
        return Err(error_at_node(
            DefErrorCode::InvalidRoot,
            "root element must be <Defs>".to_string(),
            file_path,
            &doc,
            root,
        ));
    }

    for child in root.children().filter(|node| node.is_element()) {
        let def_name = match child.tag_name().name() {
            "RoleDef" => {
                let role = parse_role_def(file_path, &doc, child)?;
                let def_name = role.def_name.clone();
                roles.push(role);
                def_name
            }
            "EffectDef" => {
                let effect = parse_effect_def(file_path, &doc, child)?;
                let def_name = effect.def_name.clone();
                effects.push(effect);
                def_name
            }
            other => {
                return Err(error_at_node(
                    DefErrorCode::UnknownDefType,
                    format!("unsupported def type <{other}>; expected <RoleDef> or <EffectDef>"),
                    file_path,
                    &doc,
                    child,
                ))
            }
        };
        if !seen_names.insert(def_name.clone()) {
            return Err(error_at_node(
                DefErrorCode::DuplicateDef,
                format!("duplicate defName '{def_name}'; each defName may appear only once"),
                file_path,
                &doc,
                child,
            ));
        }
    }

    Ok(())
}

fn parse_role_def(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<PendingRoleDef, DefCompileError> {
    let mut seen_fields = HashSet::<String>::new();
    let mut def_name: Option<String> = None;
    let mut label: Option<String> = None;
    let mut idle: Option<ActionClip> = None;
    let mut run: Option<ActionClip> = None;
    let mut jump: Option<ActionClip> = None;
    let mut death: Option<ActionClip> = None;
    let mut idle_hit: Option<ActionClip> = None;
    let mut run_hit: Option<ActionClip> = None;

    for field in node.children().filter(|child| child.is_element()) {
        let field_name = field.tag_name().name().to_string();
        if field_name != "Clip" && !seen_fields.insert(field_name.clone()) {
            return Err(error_at_node(
                DefErrorCode::DuplicateField,
                format!("duplicate field <{field_name}> in <RoleDef>"),
                file_path,
                doc,
                field,
            ));
        }

        match field_name.as_str() {
            "defName" => {
                def_name = Some(required_text(file_path, doc, field, "defName")?);
            }
            "label" => {
                label = Some(required_text(file_path, doc, field, "label")?);
            }
            "Clip" => {
                let (action, clip) = parse_role_clip(file_path, doc, field)?;
                let slot = match action.as_str() {
                    "idle" => &mut idle,
                    "run" => &mut run,
                    "jump" => &mut jump,
                    "death" => &mut death,
                    "idle_hit" => &mut idle_hit,
                    "run_hit" => &mut run_hit,
                    other => {
                        return Err(error_at_node(
                            DefErrorCode::InvalidValue,
                            format!(
                                "invalid clip action '{other}'; allowed values: idle, run, \
                                 jump, death, idle_hit, run_hit"
                            ),
                            file_path,
                            doc,
                            field,
                        ))
                    }
                };
                if slot.is_some() {
                    return Err(error_at_node(
                        DefErrorCode::DuplicateField,
                        format!("duplicate <Clip action=\"{action}\"> in <RoleDef>"),
                        file_path,
                        doc,
                        field,
                    ));
                }
                *slot = Some(clip);
            }
            _ => {
                return Err(error_at_node(
                    DefErrorCode::UnknownField,
                    format!("unknown field <{field_name}> in <RoleDef>"),
                    file_path,
                    doc,
                    field,
                ))
            }
        }
    }

    let Some(def_name) = def_name else {
        return Err(error_at_node(
            DefErrorCode::MissingField,
            "missing required field <defName> in <RoleDef>".to_string(),
            file_path,
            doc,
            node,
        ));
    };
    let Some(label) = label else {
        return Err(error_at_node(
            DefErrorCode::MissingField,
            format!("role '{def_name}' is missing required field <label>"),
            file_path,
            doc,
            node,
        ));
    };
    let Some(idle) = idle else {
        return Err(missing_clip_error(&def_name, "idle", file_path, doc, node));
    };
    let Some(run) = run else {
        return Err(missing_clip_error(&def_name, "run", file_path, doc, node));
    };
    let Some(jump) = jump else {
        return Err(missing_clip_error(&def_name, "jump", file_path, doc, node));
    };
    let Some(death) = death else {
        return Err(missing_clip_error(&def_name, "death", file_path, doc, node));
    };

    Ok(PendingRoleDef {
        def_name,
        label,
        clips: ClipSet {
            idle,
            run,
            jump,
            death,
            idle_hit,
            run_hit,
        },
    })
}

fn missing_clip_error(
    def_name: &str,
    action: &str,
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> DefCompileError {
    error_at_node(
        DefErrorCode::MissingField,
        format!("role '{def_name}' is missing required clip action '{action}'"),
        file_path,
        doc,
        node,
    )
}

fn parse_effect_def(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<PendingEffectDef, DefCompileError> {
    let mut seen_fields = HashSet::<String>::new();
    let mut def_name: Option<String> = None;
    let mut clip: Option<ActionClip> = None;

    for field in node.children().filter(|child| child.is_element()) {
        let field_name = field.tag_name().name().to_string();
        if !seen_fields.insert(field_name.clone()) {
            return Err(error_at_node(
                DefErrorCode::DuplicateField,
                format!("duplicate field <{field_name}> in <EffectDef>"),
                file_path,
                doc,
                field,
            ));
        }

        match field_name.as_str() {
            "defName" => {
                def_name = Some(required_text(file_path, doc, field, "defName")?);
            }
            "Clip" => {
                let (_, parsed) = parse_clip(file_path, doc, field, false)?;
                clip = Some(parsed);
            }
            _ => {
                return Err(error_at_node(
                    DefErrorCode::UnknownField,
                    format!("unknown field <{field_name}> in <EffectDef>"),
                    file_path,
                    doc,
                    field,
                ))
            }
        }
    }

    let Some(def_name) = def_name else {
        return Err(error_at_node(
            DefErrorCode::MissingField,
            "missing required field <defName> in <EffectDef>".to_string(),
            file_path,
            doc,
            node,
        ));
    };
    let Some(clip) = clip else {
        return Err(error_at_node(
            DefErrorCode::MissingField,
            format!("effect '{def_name}' is missing required <Clip>"),
            file_path,
            doc,
            node,
        ));
    };

    Ok(PendingEffectDef { def_name, clip })
}

fn parse_role_clip(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<(String, ActionClip), DefCompileError> {
    let (action, clip) = parse_clip(file_path, doc, node, true)?;
    match action {
        Some(action) => Ok((action, clip)),
        None => Err(error_at_node(
            DefErrorCode::MissingField,
            "role clip is missing required attribute 'action'".to_string(),
            file_path,
            doc,
            node,
        )),
    }
}

fn parse_clip(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    allow_action: bool,
) -> Result<(Option<String>, ActionClip), DefCompileError> {
    for attribute in node.attributes() {
        let name = attribute.name();
        let known = matches!(
            name,
            "sheet" | "frameWidth" | "frameHeight" | "frameCount" | "cadence" | "looped"
        ) || (allow_action && name == "action");
        if !known {
            return Err(error_at_node(
                DefErrorCode::UnknownAttribute,
                format!("unknown attribute '{name}' on <Clip>"),
                file_path,
                doc,
                node,
            ));
        }
    }

    let action = node
        .attribute("action")
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    let sheet = required_attr(file_path, doc, node, "sheet")?;
    validate_sprite_key(&sheet).map_err(|error| {
        error_at_node(
            DefErrorCode::InvalidValue,
            format!("invalid sheet key '{sheet}': {error}"),
            file_path,
            doc,
            node,
        )
    })?;

    let frame_width = parse_positive_u32(file_path, doc, node, "frameWidth")?;
    let frame_height = parse_positive_u32(file_path, doc, node, "frameHeight")?;
    let frame_count = parse_positive_u32(file_path, doc, node, "frameCount")?;
    let cadence = if node.attribute("cadence").is_some() {
        parse_positive_u32(file_path, doc, node, "cadence")?
    } else {
        ANIM_CADENCE_DEFAULT
    };
    let looped = match node.attribute("looped") {
        Some("true") | None => true,
        Some("false") => false,
        Some(other) => {
            return Err(error_at_node(
                DefErrorCode::InvalidValue,
                format!("looped must be 'true' or 'false', got '{other}'"),
                file_path,
                doc,
                node,
            ))
        }
    };

    Ok((
        action,
        ActionClip {
            sheet,
            frame_width,
            frame_height,
            frame_count,
            cadence,
            looped,
        },
    ))
}

fn required_attr(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    attr_name: &str,
) -> Result<String, DefCompileError> {
    let value = node
        .attribute(attr_name)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if value.is_empty() {
        return Err(error_at_node(
            DefErrorCode::MissingField,
            format!("clip is missing required attribute '{attr_name}'"),
            file_path,
            doc,
            node,
        ));
    }
    Ok(value)
}

fn parse_positive_u32(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    attr_name: &str,
) -> Result<u32, DefCompileError> {
    let raw = required_attr(file_path, doc, node, attr_name)?;
    let parsed = raw.parse::<u32>().map_err(|_| {
        error_at_node(
            DefErrorCode::InvalidValue,
            format!("{attr_name} '{raw}' is not a valid integer"),
            file_path,
            doc,
            node,
        )
    })?;
    if parsed == 0 {
        return Err(error_at_node(
            DefErrorCode::InvalidValue,
            format!("{attr_name} must be greater than zero"),
            file_path,
            doc,
            node,
        ));
    }
    Ok(parsed)
}

fn required_text(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    field_name: &str,
) -> Result<String, DefCompileError> {
    let value = node.text().map(str::trim).unwrap_or_default().to_string();
    if value.is_empty() {
        return Err(error_at_node(
            DefErrorCode::MissingField,
            format!("field <{field_name}> must not be empty"),
            file_path,
            doc,
            node,
        ));
    }
    Ok(value)
}

fn error_at_node(
    code: DefErrorCode,
    message: String,
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> DefCompileError {
    let pos = doc.text_pos_at(node.range().start);
    DefCompileError {
        code,
        message,
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: pos.row as usize,
            column: pos.col as usize,
        }),
    }
}
