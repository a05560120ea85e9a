pub mod make_component_uuid_not_nullable;
