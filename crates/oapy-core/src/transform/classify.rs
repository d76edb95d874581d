use indexmap::IndexMap;
use log::{debug, warn};

use crate::ir::IrParameter;
use crate::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};

use super::sanitizer::IdentTable;

/// Merge path-item-level and operation-level parameter declarations (already
/// `$ref`-resolved) and split them into ordered path and query lists.
///
/// Merge key is (location, declared name); an operation-level declaration
/// overrides a path-level one sharing a key, while the merged map keeps the
/// iteration order of first appearance. A declaration missing its location
/// or name is malformed and dropped, not fatal. Path parameters are required
/// regardless of their declared flag.
pub fn classify_parameters(
    path_level: &[ParameterOrRef],
    op_level: &[ParameterOrRef],
    table: &mut IdentTable,
) -> (Vec<IrParameter>, Vec<IrParameter>) {
    let mut merged: IndexMap<(ParameterLocation, String), &Parameter> = IndexMap::new();

    for p in path_level.iter().chain(op_level.iter()) {
        let param = match p {
            ParameterOrRef::Parameter(param) => param,
            // The resolver replaces every reference before classification.
            ParameterOrRef::Ref { ref_path } => {
                debug!("skipping unresolved parameter reference {ref_path}");
                continue;
            }
        };
        let (Some(name), Some(location)) = (&param.name, param.location) else {
            warn!("dropping malformed parameter declaration (missing name or location)");
            continue;
        };
        merged.insert((location, name.clone()), param);
    }

    let mut path_params = Vec::new();
    let mut query_params = Vec::new();

    for ((location, name), param) in &merged {
        match location {
            ParameterLocation::Path => path_params.push(IrParameter {
                ident: table.claim(name),
                original_name: name.clone(),
                description: param.description.clone(),
                required: true,
            }),
            ParameterLocation::Query => query_params.push(IrParameter {
                ident: table.claim(name),
                original_name: name.clone(),
                description: param.description.clone(),
                required: param.required,
            }),
            ParameterLocation::Header | ParameterLocation::Cookie => {
                debug!("skipping {location:?} parameter '{name}': outside the generated surface");
            }
        }
    }

    (path_params, query_params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, location: ParameterLocation, required: bool) -> ParameterOrRef {
        ParameterOrRef::Parameter(Parameter {
            name: Some(name.to_string()),
            location: Some(location),
            required,
            ..Default::default()
        })
    }

    #[test]
    fn path_params_are_always_required() {
        let mut table = IdentTable::new();
        let (path, _) = classify_parameters(
            &[param("corpusId", ParameterLocation::Path, false)],
            &[],
            &mut table,
        );
        assert_eq!(path.len(), 1);
        assert!(path[0].required);
    }

    #[test]
    fn operation_level_wins_on_shared_key() {
        let mut table = IdentTable::new();
        let path_level = vec![ParameterOrRef::Parameter(Parameter {
            name: Some("format".to_string()),
            location: Some(ParameterLocation::Query),
            description: Some("path-level".to_string()),
            required: false,
            ..Default::default()
        })];
        let op_level = vec![ParameterOrRef::Parameter(Parameter {
            name: Some("format".to_string()),
            location: Some(ParameterLocation::Query),
            description: Some("op-level".to_string()),
            required: true,
            ..Default::default()
        })];
        let (_, query) = classify_parameters(&path_level, &op_level, &mut table);
        assert_eq!(query.len(), 1);
        assert_eq!(query[0].description.as_deref(), Some("op-level"));
        assert!(query[0].required);
    }

    #[test]
    fn merge_preserves_first_appearance_order() {
        let mut table = IdentTable::new();
        let path_level = vec![
            param("a", ParameterLocation::Query, false),
            param("b", ParameterLocation::Query, false),
        ];
        // Overriding "a" at operation level must not move it after "b".
        let op_level = vec![
            param("a", ParameterLocation::Query, true),
            param("c", ParameterLocation::Query, false),
        ];
        let (_, query) = classify_parameters(&path_level, &op_level, &mut table);
        let names: Vec<&str> = query.iter().map(|p| p.original_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(query[0].required, "op-level flag wins for 'a'");
    }

    #[test]
    fn same_name_different_location_is_not_a_duplicate() {
        let mut table = IdentTable::new();
        let params = vec![
            param("id", ParameterLocation::Path, true),
            param("id", ParameterLocation::Query, false),
        ];
        let (path, query) = classify_parameters(&params, &[], &mut table);
        assert_eq!(path.len(), 1);
        assert_eq!(query.len(), 1);
        assert_eq!(path[0].ident, "id");
        assert_eq!(query[0].ident, "id_2");
    }

    #[test]
    fn malformed_declarations_are_dropped() {
        let mut table = IdentTable::new();
        let params = vec![
            ParameterOrRef::Parameter(Parameter::default()),
            ParameterOrRef::Parameter(Parameter {
                name: Some("nameless-location".to_string()),
                ..Default::default()
            }),
            param("ok", ParameterLocation::Query, false),
        ];
        let (path, query) = classify_parameters(&params, &[], &mut table);
        assert!(path.is_empty());
        assert_eq!(query.len(), 1);
        assert_eq!(query[0].original_name, "ok");
    }

    #[test]
    fn header_parameters_are_skipped() {
        let mut table = IdentTable::new();
        let params = vec![param("X-Trace", ParameterLocation::Header, false)];
        let (path, query) = classify_parameters(&params, &[], &mut table);
        assert!(path.is_empty());
        assert!(query.is_empty());
    }
}
