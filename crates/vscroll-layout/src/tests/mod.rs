mod index_properties;
