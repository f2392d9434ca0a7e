//! Integration tests for CLI commands

use std::io::Write;
use std::process::{Command, Stdio};

/// Helper to run secret2es command
fn secret2es(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_secret2es"))
        .args(args)
        .env_remove("SECRET2ES_STORE_NAME")
        .env_remove("SECRET2ES_STRICT")
        .env_remove("ENV")
        .output()
        .expect("Failed to execute secret2es")
}

/// Get the fixtures path
fn fixtures_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures")
}

fn fixture(name: &str) -> String {
    format!("{}/{}", fixtures_path(), name)
}

fn documents(output: &str) -> Vec<serde_yaml::Value> {
    serde_yaml::Deserializer::from_str(output)
        .map(|doc| serde::Deserialize::deserialize(doc).expect("valid YAML document"))
        .collect()
}

mod es_gen_command {
    use super::*;

    #[test]
    fn test_opaque_secret() {
        let output = secret2es(&["es-gen", "-i", &fixture("opaque.yaml"), "-n", "vault"]);

        assert!(output.status.success(), "Expected success for opaque secret");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.starts_with("---\n"));
        assert!(stdout.contains(r#"dist: "{{ .dist-name-of-linux }}""#));

        let docs = documents(&stdout);
        assert_eq!(docs.len(), 1);
        let es = &docs[0];
        assert_eq!(es["apiVersion"], "external-secrets.io/v1beta1");
        assert_eq!(es["metadata"]["namespace"], "default");
        assert_eq!(es["metadata"]["labels"]["app"], "demo");
        assert_eq!(es["spec"]["secretStoreRef"]["kind"], "ClusterSecretStore");
        assert_eq!(es["spec"]["secretStoreRef"]["name"], "vault");
        assert_eq!(es["spec"]["data"][0]["remoteRef"]["key"], "foo");
        assert_eq!(es["spec"]["data"][1]["remoteRef"]["property"], "github-username");
        assert_eq!(es["spec"]["data"][1]["remoteRef"]["decodingStrategy"], "Base64");
    }

    #[test]
    fn test_store_options() {
        let output = secret2es(&[
            "es-gen",
            "-i",
            &fixture("opaque.yaml"),
            "-n",
            "team-store",
            "-s",
            "SecretStore",
            "--creation-policy",
            "Owner",
            "--refresh-interval",
            "1h",
        ]);

        assert!(output.status.success());
        let docs = documents(&String::from_utf8_lossy(&output.stdout));
        assert_eq!(docs[0]["spec"]["secretStoreRef"]["kind"], "SecretStore");
        assert_eq!(docs[0]["spec"]["target"]["creationPolicy"], "Owner");
        assert_eq!(docs[0]["spec"]["refreshInterval"], "1h");
    }

    #[test]
    fn test_mixed_stream_with_warning() {
        let output = secret2es(&["es-gen", "-i", &fixture("mixed.yaml"), "-n", "vault"]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let docs = documents(&stdout);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["metadata"]["name"], "database");
        assert_eq!(
            docs[0]["spec"]["target"]["template"]["data"]["url"],
            "postgres://{{ .DB_USER }}:{{ .DB_PASSWORD }}@db:5432/app"
        );
        assert_eq!(
            docs[0]["spec"]["target"]["template"]["data"]["my.cnf"],
            "[client]\nuser = {{ .DB_USER }}\npassword = {{ .DB_PASSWORD }}\n"
        );
        assert_eq!(docs[0]["spec"]["data"].as_sequence().map(Vec::len), Some(2));

        assert!(stderr.contains("not include any angle brackets of secret: static"));
    }

    #[test]
    fn test_strict_fails_on_warning() {
        let output = secret2es(&[
            "es-gen",
            "-i",
            &fixture("mixed.yaml"),
            "-n",
            "vault",
            "--strict",
        ]);

        assert_eq!(output.status.code(), Some(2));
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn test_basic_auth() {
        let output = secret2es(&["es-gen", "-i", &fixture("basic-auth.yaml"), "-n", "vault"]);

        assert!(output.status.success());
        let docs = documents(&String::from_utf8_lossy(&output.stdout));
        let template = &docs[0]["spec"]["target"]["template"];
        assert_eq!(template["type"], "kubernetes.io/basic-auth");
        assert_eq!(template["mergePolicy"], "Merge");
        assert_eq!(template["data"]["username"], "{{ .GIT_USERNAME }}");
        assert_eq!(docs[0]["spec"]["data"][0]["remoteRef"]["key"], "ci/git");
    }

    #[test]
    fn test_docker_config_json() {
        let output = secret2es(&[
            "es-gen",
            "-i",
            &fixture("dockerconfigjson.yaml"),
            "-n",
            "vault",
        ]);

        assert!(output.status.success());
        let docs = documents(&String::from_utf8_lossy(&output.stdout));
        assert_eq!(
            docs[0]["spec"]["target"]["template"]["data"][".dockerconfigjson"],
            r#"{"auths":{"docker.io":{"auth":"{{ .DOCKER_AUTH }}"},"ghcr.io":{"auth":"{{ .GHCR_AUTH }}"}}}"#
        );
    }

    #[test]
    fn test_tls() {
        let output = secret2es(&["es-gen", "-i", &fixture("tls.yaml"), "-n", "vault"]);

        assert!(output.status.success());
        let docs = documents(&String::from_utf8_lossy(&output.stdout));
        assert_eq!(docs[0]["spec"]["target"]["template"]["type"], "kubernetes.io/tls");
        assert_eq!(docs[0]["spec"]["data"][0]["remoteRef"]["decodingStrategy"], "Auto");
    }

    #[test]
    fn test_resolve_with_env_flag() {
        let output = secret2es(&[
            "es-gen",
            "-i",
            &fixture("env.yaml"),
            "-n",
            "vault",
            "--resolve",
            "-e",
            "ENV=prod",
        ]);

        assert!(output.status.success());
        let docs = documents(&String::from_utf8_lossy(&output.stdout));
        let es = &docs[0];
        assert_eq!(es["spec"]["data"][0]["remoteRef"]["key"], "prod/app");
        assert_eq!(es["spec"]["data"][0]["remoteRef"]["property"], "prod_PASSWORD");
        assert_eq!(es["spec"]["target"]["template"]["data"]["dist"], "prod-{{ .DIST }}");
    }

    #[test]
    fn test_resolve_unset_variable() {
        let output = secret2es(&["es-gen", "-i", &fixture("env.yaml"), "-n", "vault", "--resolve"]);

        assert_eq!(output.status.code(), Some(2));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("not set ENV: ENV"));
    }

    #[test]
    fn test_env_placeholder_kept_without_resolve() {
        let output = secret2es(&["es-gen", "-i", &fixture("env.yaml"), "-n", "vault"]);

        // the vault path still holds `<% ENV %>`, so the key is taken as is
        assert!(output.status.success());
        let docs = documents(&String::from_utf8_lossy(&output.stdout));
        assert_eq!(
            docs[0]["spec"]["target"]["template"]["data"]["dist"],
            "<% ENV %>-{{ .DIST }}"
        );
        assert_eq!(docs[0]["spec"]["data"][0]["remoteRef"]["key"], "<% ENV %>/app");
    }

    #[test]
    fn test_syntax_error_exit_code() {
        let output = secret2es(&["es-gen", "-i", &fixture("unclosed.yaml"), "-n", "vault"]);

        assert_eq!(output.status.code(), Some(3));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("unclosed"));
    }

    #[test]
    fn test_illegal_vault_path() {
        let output = secret2es(&["es-gen", "-i", &fixture("bad-path.yaml"), "-n", "vault"]);

        assert_eq!(output.status.code(), Some(2));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("illegal vault path: secret/foo/bar"));
    }

    #[test]
    fn test_missing_input_file() {
        let output = secret2es(&["es-gen", "-i", "/nonexistent/secrets.yaml", "-n", "vault"]);
        assert_eq!(output.status.code(), Some(5));
    }

    #[test]
    fn test_illegal_store_type_is_usage_error() {
        let output = secret2es(&[
            "es-gen",
            "-i",
            &fixture("opaque.yaml"),
            "-n",
            "vault",
            "-s",
            "VaultStore",
        ]);
        assert_eq!(output.status.code(), Some(64));
    }

    #[test]
    fn test_missing_store_name() {
        let output = secret2es(&["es-gen", "-i", &fixture("opaque.yaml")]);
        assert_eq!(output.status.code(), Some(64));
    }

    #[test]
    fn test_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("external-secrets.yaml");

        let output = secret2es(&[
            "es-gen",
            "-i",
            &fixture("tls.yaml"),
            "-n",
            "vault",
            "-o",
            path.to_str().unwrap(),
        ]);

        assert!(output.status.success());
        assert!(output.stdout.is_empty());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("name: web-tls"));
    }

    #[test]
    fn test_stdin_input() {
        let content = std::fs::read_to_string(fixture("basic-auth.yaml")).unwrap();
        let mut child = Command::new(env!("CARGO_BIN_EXE_secret2es"))
            .args(["es-gen", "-i", "-", "-n", "vault"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        child
            .stdin
            .take()
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
        let output = child.wait_with_output().unwrap();

        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("name: git-credentials"));
    }

    #[test]
    fn test_convert_alias() {
        let output = secret2es(&["convert", "-i", &fixture("opaque.yaml"), "-n", "vault"]);
        assert!(output.status.success());
    }
}

mod version_command {
    use super::*;

    #[test]
    fn test_version() {
        let output = secret2es(&["version"]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_help() {
        let output = secret2es(&["--help"]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("es-gen"));
        assert!(stdout.contains("serve"));
    }
}
