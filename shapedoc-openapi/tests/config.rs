use shapedoc_core::config::{AppConfig, ConfigError};
use shapedoc_openapi::{OpenApiConfig, SecurityScheme, DEFAULT_REDOC_JS_URL};

#[test]
fn defaults() {
    let config = OpenApiConfig::new();
    assert_eq!(config.openapi_path.as_deref(), Some("/openapi.json"));
    assert_eq!(config.redoc_path.as_deref(), Some("/redocs"));
    assert_eq!(config.swagger_path.as_deref(), Some("/docs"));
    assert!(config.title.is_none());
    assert_eq!(config.version, "0.1.0");
    assert!(!config.convert_casing);
    assert!(config.tags.is_none());
    assert!(config.servers.is_none());
    assert!(config.security_schemes.is_none());
    assert!(config.security.is_none());
    assert_eq!(config.redoc_js_url, DEFAULT_REDOC_JS_URL);
}

#[test]
fn builder_disables_paths() {
    let config = OpenApiConfig::new()
        .with_redoc_path(None)
        .with_swagger_path(Some("/swagger"));
    assert!(config.redoc_path.is_none());
    assert_eq!(config.swagger_path.as_deref(), Some("/swagger"));
}

#[test]
fn redeclared_security_scheme_is_replaced() {
    let config = OpenApiConfig::new()
        .with_security_scheme("auth", SecurityScheme::bearer(None))
        .with_security_scheme("auth", SecurityScheme::bearer(Some("JWT")));
    let schemes = config.security_schemes.unwrap();
    assert_eq!(schemes.len(), 1);
    assert_eq!(schemes[0].1, SecurityScheme::bearer(Some("JWT")));
}

#[test]
fn empty_app_config_gives_defaults() {
    let config = OpenApiConfig::from_config(&AppConfig::empty()).unwrap();
    assert_eq!(config.openapi_path.as_deref(), Some("/openapi.json"));
    assert_eq!(config.version, "0.1.0");
}

#[test]
fn reads_openapi_section() {
    let yaml = r#"
openapi:
  path: /spec.json
  redoc: ~
  title: Petstore
  version: 1.2.3
  casing: true
  tags:
    - name: pets
      description: Pet operations
  servers:
    - url: https://api.example.com
  security-schemes:
    bearer:
      type: http
      scheme: bearer
      bearerFormat: JWT
  security:
    - name: bearer
      scopes: [read]
"#;
    let app_config = AppConfig::from_yaml_str(yaml, "test").unwrap();
    let config = OpenApiConfig::from_config(&app_config).unwrap();

    assert_eq!(config.openapi_path.as_deref(), Some("/spec.json"));
    assert!(config.redoc_path.is_none());
    assert_eq!(config.swagger_path.as_deref(), Some("/docs"));
    assert_eq!(config.title.as_deref(), Some("Petstore"));
    assert_eq!(config.version, "1.2.3");
    assert!(config.convert_casing);
    assert_eq!(config.tags.unwrap()[0].name, "pets");
    assert_eq!(config.servers.unwrap()[0].url, "https://api.example.com");

    let schemes = config.security_schemes.unwrap();
    assert_eq!(schemes[0].0, "bearer");
    assert_eq!(schemes[0].1, SecurityScheme::bearer(Some("JWT")));

    let security = config.security.unwrap();
    assert_eq!(security[0].name, "bearer");
    assert_eq!(security[0].scopes, vec!["read"]);
}

#[test]
fn null_openapi_path_disables_documentation() {
    let app_config = AppConfig::from_yaml_str("openapi:\n  path: ~\n", "test").unwrap();
    let config = OpenApiConfig::from_config(&app_config).unwrap();
    assert!(config.openapi_path.is_none());
}

#[test]
fn unknown_security_scheme_type_is_invalid() {
    let yaml = "openapi:\n  security-schemes:\n    odd:\n      type: carrier-pigeon\n";
    let app_config = AppConfig::from_yaml_str(yaml, "test").unwrap();
    let err = OpenApiConfig::from_config(&app_config).unwrap_err();
    match err {
        ConfigError::Invalid { key, .. } => assert_eq!(key, "openapi.security-schemes.odd"),
        other => panic!("unexpected error: {other}"),
    }
}
