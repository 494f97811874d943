use shared_config::DeploymentMode;

#[test]
fn production_build_mode_is_production() {
    let mode = DeploymentMode::from_signals(None, "production");
    assert_eq!(mode, DeploymentMode::Production);
    assert!(mode.is_production());
}

#[test]
fn explicit_override_is_production_regardless_of_build_mode() {
    let mode = DeploymentMode::from_signals(Some(true), "development");
    assert_eq!(mode, DeploymentMode::Production);
}

#[test]
fn override_false_does_not_force_non_production() {
    // An explicit false still yields production when the build mode says so.
    let mode = DeploymentMode::from_signals(Some(false), "production");
    assert_eq!(mode, DeploymentMode::Production);
}

#[test]
fn abbreviated_prod_build_mode_is_not_trusted() {
    let mode = DeploymentMode::from_signals(None, "prod");
    assert_eq!(mode, DeploymentMode::NonProduction);
}

#[test]
fn development_defaults_to_non_production() {
    let mode = DeploymentMode::from_signals(None, "development");
    assert_eq!(mode, DeploymentMode::NonProduction);
    assert!(!mode.is_production());
}
