use anyhow::bail;
use semver::{Version, VersionReq};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fail when `actual` does not satisfy the version requirement of the project.
pub(crate) fn enforce_requirement(required: &VersionReq, actual: Version) -> anyhow::Result<()> {
    // A bare `*` would still reject pre-release versions, accept those too.
    if required == &VersionReq::STAR {
        return Ok(());
    }

    if !required.matches(&actual) {
        bail!("the project requires lectern '{required}', but this is lectern '{actual}'");
    }

    tracing::debug!("version {actual} satisfies the required {required}");

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::star_takes_everything("*", "0.1.0", true)]
    #[case::star_takes_pre_releases("*", "0.1.0-alpha.1", true)]
    #[case::exact_match("0.1.0", "0.1.0", true)]
    #[case::patch_upgrades_match("0.1.0", "0.1.1", true)]
    // below 1.0.0 a minor bump counts as a breaking change
    #[case::minor_is_breaking_pre_1("0.1.1", "0.2.0", false)]
    #[case::no_downgrades("0.1.1", "0.1.0", false)]
    #[case::pre_release_of_a_match_is_no_match("0.1.1", "0.1.1-alpha.1", false)]
    #[case::later_pre_release_matches("0.1.0-alpha.1", "0.1.0-alpha.2", true)]
    #[case::earlier_pre_release_does_not("0.1.0-alpha.2", "0.1.0-alpha.1", false)]
    #[case::release_covers_its_pre_releases("0.1.0-alpha.1", "0.1.0", true)]
    #[case::open_lower_bound(">=0.1.0", "0.2.0", true)]
    // pre-releases only match a `>=` bound within their own base version
    #[case::open_bound_skips_foreign_pre_releases(">=0.1.0-alpha.1", "0.2.0-alpha.1", false)]
    #[case::open_bound_with_pre_release(">=0.1.0-alpha.1", "0.1.0-rc.1", true)]
    fn requirement_outcomes(
        #[case] required: VersionReq,
        #[case] actual: Version,
        #[case] accepted: bool,
    ) {
        assert_eq!(accepted, enforce_requirement(&required, actual).is_ok());
    }
}
