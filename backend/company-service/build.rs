// Build script for company-service
// Generates the CompanyService server and client from hand-declared methods
// (see ../protos/company_service.proto), so no protoc is needed.
use tonic_build::manual::{Builder, Method, Service};

fn method(name: &str, route_name: &str, input: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route_name)
        .input_type(format!("crate::grpc::pb::{input}"))
        .output_type("crate::grpc::pb::CreateUserResponse")
        .codec_path("tonic::codec::ProstCodec")
        .build()
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../protos/company_service.proto");

    let service = Service::builder()
        .name("CompanyService")
        .package("")
        .method(method("register", "Register", "CreateUserRequest"))
        .method(method("login", "Login", "LoginRequest"))
        .method(method("refresh", "Refresh", "RefreshRequest"))
        .build();

    Builder::new().compile(&[service]);
}
