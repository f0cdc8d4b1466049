/// gRPC surface of the company service
///
/// Exports:
/// - CompanyServer: Register / Login / Refresh handlers
/// - pb: wire messages plus the generated server and client
pub mod server;

pub use server::CompanyServer;

pub mod pb {
    //! Messages of `company_service.proto`

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CreateUserRequest {
        #[prost(string, tag = "1")]
        pub name: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct LoginRequest {
        #[prost(string, tag = "1")]
        pub name: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct RefreshRequest {
        #[prost(string, tag = "1")]
        pub refresh_token: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CreateUserResponse {
        #[prost(string, tag = "1")]
        pub access_token: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub refresh_token: ::prost::alloc::string::String,
        #[prost(string, tag = "3")]
        pub token_type: ::prost::alloc::string::String,
        #[prost(int64, tag = "4")]
        pub expires_in: i64,
    }

    impl From<jwt_core::TokenPair> for CreateUserResponse {
        fn from(pair: jwt_core::TokenPair) -> Self {
            Self {
                access_token: pair.access_token,
                refresh_token: pair.refresh_token,
                token_type: pair.token_type,
                expires_in: pair.expires_in,
            }
        }
    }

    // `<package>.<service>.rs` with an empty package
    include!(concat!(env!("OUT_DIR"), "/.CompanyService.rs"));
}
