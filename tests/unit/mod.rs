// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Unit tests for instancetype-webhook.
//!
//! These tests run without a Kubernetes cluster and drive both admitters
//! with serialized admission reviews, the same way the API server does.

#[path = "../common/mod.rs"]
mod common;

mod admission_tests {
    use super::common::fixtures::{InstancetypeBuilder, VERSIONS, admission_request};
    use instancetype_webhook::crd::{CLUSTER_PLURAL_RESOURCE_NAME, PLURAL_RESOURCE_NAME};
    use instancetype_webhook::webhooks::{
        AdmissionResponse, Admitter, ClusterInstancetypeAdmitter, InstancetypeAdmitter, Operation,
    };
    use serde_json::json;

    /// Admit `builder` through both admitters, returning (namespaced, cluster).
    fn admit_both(
        builder: InstancetypeBuilder,
        version: &str,
        operation: Operation,
    ) -> (AdmissionResponse, AdmissionResponse) {
        let namespaced = admission_request(
            &builder.clone().build(),
            operation.clone(),
            version,
            PLURAL_RESOURCE_NAME,
        );
        let cluster = admission_request(
            &builder.build_cluster(),
            operation,
            version,
            CLUSTER_PLURAL_RESOURCE_NAME,
        );
        (
            InstancetypeAdmitter.admit(&namespaced),
            ClusterInstancetypeAdmitter.admit(&cluster),
        )
    }

    #[test]
    fn test_scenario_a_valid_instancetype_allowed() {
        for version in VERSIONS {
            let (namespaced, cluster) =
                admit_both(InstancetypeBuilder::default(), version, Operation::Create);
            assert!(namespaced.allowed, "expected allow with {version}");
            assert!(cluster.allowed, "expected allow with {version}");
        }
    }

    #[test]
    fn test_scenario_b_negative_overcommit_denied() {
        let builder = InstancetypeBuilder::default().overcommit_percent(-15);
        let (namespaced, cluster) = admit_both(builder, "v1beta1", Operation::Create);
        for response in [namespaced, cluster] {
            assert!(!response.allowed);
            assert_eq!(response.result.code, 422);
            assert!(response.result.message.contains("between 0 and 100"));
        }
    }

    #[test]
    fn test_scenario_c_over_one_hundred_overcommit_denied() {
        let builder = InstancetypeBuilder::default().overcommit_percent(150);
        let (namespaced, cluster) = admit_both(builder, "v1beta1", Operation::Create);
        for response in [namespaced, cluster] {
            assert!(!response.allowed);
            assert_eq!(response.result.code, 422);
        }
    }

    #[test]
    fn test_scenario_d_overcommit_with_hugepages_denied() {
        let builder = InstancetypeBuilder::default()
            .overcommit_percent(15)
            .hugepages("1Gi");
        let (namespaced, cluster) = admit_both(builder, "v1beta1", Operation::Create);
        for response in [namespaced, cluster] {
            assert!(!response.allowed);
            assert_eq!(response.result.code, 422);
            assert!(response.result.message.contains("overcommit"));
            assert!(response.result.message.contains("hugepages"));
        }
    }

    #[test]
    fn test_hugepages_without_overcommit_allowed() {
        let builder = InstancetypeBuilder::default().hugepages("2Mi");
        let (namespaced, cluster) = admit_both(builder, "v1beta1", Operation::Create);
        assert!(namespaced.allowed);
        assert!(cluster.allowed);
    }

    #[test]
    fn test_update_is_validated() {
        let builder = InstancetypeBuilder::default()
            .overcommit_percent(15)
            .hugepages("1Gi");
        let (namespaced, cluster) = admit_both(builder, "v1beta1", Operation::Update);
        assert!(!namespaced.allowed);
        assert!(!cluster.allowed);
    }

    #[test]
    fn test_both_admitters_agree() {
        let cases = [
            InstancetypeBuilder::default(),
            InstancetypeBuilder::default().overcommit_percent(-15),
            InstancetypeBuilder::default().overcommit_percent(150),
            InstancetypeBuilder::default().overcommit_percent(15).hugepages("1Gi"),
            InstancetypeBuilder::default().overcommit_percent(100),
        ];
        for builder in cases {
            let (namespaced, cluster) = admit_both(builder, "v1beta1", Operation::Create);
            assert_eq!(namespaced.allowed, cluster.allowed);
            assert_eq!(namespaced.result.code, cluster.result.code);
            assert_eq!(namespaced.result.message, cluster.result.message);
        }
    }

    #[test]
    fn test_unsupported_version_denied() {
        let request = admission_request(
            &InstancetypeBuilder::default().build(),
            Operation::Create,
            "v1",
            PLURAL_RESOURCE_NAME,
        );
        let response = InstancetypeAdmitter.admit(&request);
        assert!(!response.allowed);
        assert_eq!(response.result.code, 422);
        assert!(response.result.message.contains("unsupported API version"));
    }

    #[test]
    fn test_integer_memory_quantities_allowed() {
        for version in VERSIONS {
            let object = json!({
                "apiVersion": format!("instancetype.kubevirt.io/{version}"),
                "kind": "VirtualMachineInstancetype",
                "metadata": {"name": "numeric", "namespace": "test-namespace"},
                "spec": {
                    "cpu": {"guest": 1},
                    "memory": {"guest": 134217728, "overcommitPercent": 15}
                }
            });
            let request =
                admission_request(&object, Operation::Create, version, PLURAL_RESOURCE_NAME);
            let response = InstancetypeAdmitter.admit(&request);
            assert!(
                response.allowed,
                "expected allow with {version}: {}",
                response.result.message
            );
        }
    }

    #[test]
    fn test_foreign_group_denied() {
        let mut request = admission_request(
            &InstancetypeBuilder::default().build(),
            Operation::Create,
            "v1beta1",
            PLURAL_RESOURCE_NAME,
        );
        request.resource.group = "kubevirt.io".to_string();
        let response = InstancetypeAdmitter.admit(&request);
        assert!(!response.allowed);
        assert_eq!(response.result.code, 422);
        assert!(response.result.message.contains("kubevirt.io/virtualmachineinstancetypes"));
    }

    #[test]
    fn test_wrong_plural_denied() {
        let request = admission_request(
            &InstancetypeBuilder::default().build_cluster(),
            Operation::Create,
            "v1beta1",
            CLUSTER_PLURAL_RESOURCE_NAME,
        );
        let response = InstancetypeAdmitter.admit(&request);
        assert!(!response.allowed);
        assert_eq!(response.result.code, 422);
    }
}

mod version_tests {
    use super::common::fixtures::{InstancetypeBuilder, VERSIONS, admission_request};
    use instancetype_webhook::crd::PLURAL_RESOURCE_NAME;
    use instancetype_webhook::webhooks::{Admitter, InstancetypeAdmitter, Operation};

    #[test]
    fn test_same_verdict_across_versions() {
        let cases = [
            InstancetypeBuilder::default(),
            InstancetypeBuilder::default().overcommit_percent(150),
            InstancetypeBuilder::default().overcommit_percent(15).hugepages("1Gi"),
        ];
        for builder in cases {
            let instancetype = builder.build();
            let verdicts: Vec<(bool, u16)> = VERSIONS
                .iter()
                .map(|version| {
                    let request = admission_request(
                        &instancetype,
                        Operation::Create,
                        version,
                        PLURAL_RESOURCE_NAME,
                    );
                    let response = InstancetypeAdmitter.admit(&request);
                    (response.allowed, response.result.code)
                })
                .collect();
            assert!(
                verdicts.windows(2).all(|pair| pair[0] == pair[1]),
                "verdicts differ across versions: {verdicts:?}"
            );
        }
    }
}

mod codec_tests {
    use super::common::fixtures::{InstancetypeBuilder, admission_request};
    use instancetype_webhook::crd::{CLUSTER_PLURAL_RESOURCE_NAME, InstancetypeKind};
    use instancetype_webhook::webhooks::Operation;
    use instancetype_webhook::webhooks::codec::{DECODERS, decode};

    #[test]
    fn test_cluster_object_decodes_into_shared_spec() {
        let builder = InstancetypeBuilder::new("large").cpu(8).memory("16Gi");
        let expected = builder.spec();
        for (version, _) in DECODERS {
            let request = admission_request(
                &builder.clone().build_cluster(),
                Operation::Create,
                version,
                CLUSTER_PLURAL_RESOURCE_NAME,
            );
            let spec = decode(&request, InstancetypeKind::Cluster).unwrap();
            assert_eq!(spec, expected, "version {version}");
        }
    }
}
